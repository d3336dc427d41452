//! OS / file-system resource exposure: CacheStorage enumeration and File
//! System Access availability.
//!
//! `showOpenFilePicker` is gesture gated; only its presence is recorded and
//! no file is ever opened.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::rc::Rc;

use super::js_helpers;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::Result;
use crate::guard::{safe_call, Guarded};
use crate::report::ProbeData;
use crate::runner::Probe;

pub const CACHE_NAME_LIMIT: usize = 50;

pub struct OsFilesCacheProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl OsFilesCacheProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }
}

/// CacheStorage key names, or `None` when there is no CacheStorage.
pub(crate) async fn cache_keys(limit: usize) -> Result<Option<Vec<Value>>> {
    let window = js_helpers::window()?;
    if !js_helpers::has(&window, "caches") {
        return Ok(None);
    }
    let keys = js_helpers::settle(window.caches()?.keys().into()).await?;
    Ok(Some(js_helpers::string_list(&keys, limit)))
}

#[async_trait(?Send)]
impl Probe for OsFilesCacheProbe {
    fn name(&self) -> &'static str {
        "os_files_cache"
    }

    fn vector(&self) -> &'static str {
        "os-files-cache"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        let cache_support = self.caps.supports(Capability::CacheStorage);
        data.insert("cache_support".into(), json!(cache_support));

        let names = if cache_support {
            safe_call(|| cache_keys(CACHE_NAME_LIMIT)).await
        } else {
            Guarded::Value(None)
        };
        data.insert("cache_names".into(), serde_json::to_value(names)?);

        data.insert(
            "file_api".into(),
            json!({ "supported": self.caps.supports(Capability::FileSystemAccess) }),
        );
        data.insert("last_selected".into(), Value::Null);
        Ok(data)
    }
}
