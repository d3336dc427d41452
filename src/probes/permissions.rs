//! Configuration requiring specific permissions: geolocation and
//! notification permission states.
//!
//! Only `permissions.query` is used; no prompt is ever triggered.

use async_trait::async_trait;
use js_sys::{Object, Reflect};
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::JsValue;

use super::js_helpers;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::{ProbeError, Result};
use crate::report::ProbeData;
use crate::runner::Probe;

pub const QUERIED: [&str; 2] = ["geolocation", "notifications"];

pub struct PermissionsProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl PermissionsProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }
}

async fn query_state(permissions: &web_sys::Permissions, name: &str) -> Result<String> {
    let descriptor = Object::new();
    Reflect::set(&descriptor, &JsValue::from_str("name"), &JsValue::from_str(name))?;
    let status = js_helpers::settle(permissions.query(&descriptor)?.into()).await?;
    js_helpers::get_string(&status, "state")
        .ok_or_else(|| ProbeError::Platform("TypeError: PermissionStatus.state missing".into()))
}

async fn query_all() -> Result<serde_json::Value> {
    let permissions = js_helpers::window()?.navigator().permissions()?;
    let mut states = serde_json::Map::new();
    for name in QUERIED {
        states.insert(name.into(), json!(query_state(&permissions, name).await?));
    }
    Ok(serde_json::Value::Object(states))
}

#[async_trait(?Send)]
impl Probe for PermissionsProbe {
    fn name(&self) -> &'static str {
        "permissions"
    }

    fn vector(&self) -> &'static str {
        "permissions-geo-notif"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        if self.caps.supports(Capability::Permissions) {
            match query_all().await {
                Ok(states) => {
                    data.insert("permissions".into(), states);
                }
                Err(e) => {
                    data.insert("permissions_error".into(), json!(e.to_string()));
                }
            }
        } else {
            data.insert("permissions".into(), json!({ "supported": false }));
        }
        data.insert(
            "geolocation_supported".into(),
            json!(self.caps.supports(Capability::Geolocation)),
        );
        Ok(data)
    }
}
