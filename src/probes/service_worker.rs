//! Control-flow differences between engines: service worker registration
//! lookup and CacheStorage behavior.

use async_trait::async_trait;
use serde_json::json;
use std::rc::Rc;
use web_sys::ServiceWorkerRegistration;
use wasm_bindgen::JsCast;

use super::js_helpers;
use super::os_files::cache_keys;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::Result;
use crate::report::ProbeData;
use crate::runner::Probe;

const CACHE_NAME_LIMIT: usize = 10;

pub struct ServiceWorkerCacheProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl ServiceWorkerCacheProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }
}

/// Scope of the registration controlling this page, if any.
async fn registration_scope() -> Result<Option<String>> {
    let container = js_helpers::window()?.navigator().service_worker();
    let found = js_helpers::settle(container.get_registration().into()).await?;
    Ok(found
        .dyn_into::<ServiceWorkerRegistration>()
        .ok()
        .map(|reg| reg.scope()))
}

#[async_trait(?Send)]
impl Probe for ServiceWorkerCacheProbe {
    fn name(&self) -> &'static str {
        "sw_cache"
    }

    fn vector(&self) -> &'static str {
        "sw-cache"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        let sw_supported = self.caps.supports(Capability::ServiceWorker);
        data.insert("serviceWorker_supported".into(), json!(sw_supported));

        if sw_supported {
            match registration_scope().await {
                Ok(scope) => {
                    data.insert(
                        "serviceWorker_registration_present".into(),
                        json!(scope.is_some()),
                    );
                    data.insert("serviceWorker_scope".into(), json!(scope));
                }
                Err(e) => {
                    data.insert("serviceWorker_error".into(), json!(e.to_string()));
                }
            }
        }

        if self.caps.supports(Capability::CacheStorage) {
            match cache_keys(usize::MAX).await {
                Ok(Some(names)) => {
                    data.insert("cache_count".into(), json!(names.len()));
                    let shown: Vec<_> = names.into_iter().take(CACHE_NAME_LIMIT).collect();
                    data.insert("cache_names".into(), json!(shown));
                }
                Ok(None) => {
                    data.insert("cache_supported".into(), json!(false));
                }
                Err(e) => {
                    data.insert("cache_error".into(), json!(e.to_string()));
                }
            }
        } else {
            data.insert("cache_supported".into(), json!(false));
        }
        Ok(data)
    }
}
