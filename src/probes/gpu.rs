//! Platform implementation differences: user agent, WebGPU adapter and the
//! unmasked WebGL vendor/renderer pair.

use async_trait::async_trait;
use js_sys::Array;
use serde_json::{json, Map, Value};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGlRenderingContext};

use super::js_helpers;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::{ProbeError, Result};
use crate::guard::{safe_call, Guarded};
use crate::report::ProbeData;
use crate::runner::Probe;

/// `WEBGL_debug_renderer_info.UNMASKED_VENDOR_WEBGL`
const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;
/// `WEBGL_debug_renderer_info.UNMASKED_RENDERER_WEBGL`
const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

pub struct GpuUserAgentProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl GpuUserAgentProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }

    async fn webgpu(&self) -> Result<Value> {
        let mut out = Map::new();
        out.insert("supported".into(), json!(self.caps.supports(Capability::WebGpu)));
        if !self.caps.supports(Capability::WebGpuAdapter) {
            return Ok(Value::Object(out));
        }

        let navigator: JsValue = js_helpers::window()?.navigator().into();
        let gpu = &js_helpers::get(&navigator, "gpu");
        let adapter = safe_call(move || async move {
            let pending = js_helpers::call_method(gpu, "requestAdapter", &Array::new())?;
            js_helpers::settle(pending).await
        })
        .await;

        match adapter {
            Guarded::Value(adapter) => {
                if let Some(name) = js_helpers::get_string(&adapter, "name") {
                    out.insert("adapterName".into(), json!(name));
                    out.insert(
                        "limits".into(),
                        js_helpers::to_json(&js_helpers::get(&adapter, "limits"))?,
                    );
                } else if js_helpers::has(&adapter, "info") {
                    // Newer engines moved identification onto `adapter.info`.
                    let info = js_helpers::get(&adapter, "info");
                    out.insert(
                        "adapter".into(),
                        json!({
                            "vendor": js_helpers::get_string(&info, "vendor"),
                            "architecture": js_helpers::get_string(&info, "architecture"),
                        }),
                    );
                } else if adapter.is_null() || adapter.is_undefined() {
                    out.insert("adapter".into(), Value::Null);
                } else {
                    out.insert(
                        "adapter".into(),
                        json!({ "toString": crate::error::describe_js_value(&adapter) }),
                    );
                }
            }
            Guarded::Failed(failure) => {
                out.insert("adapter".into(), serde_json::to_value(failure)?);
            }
        }
        Ok(Value::Object(out))
    }
}

fn webgl() -> Result<Value> {
    let document = js_helpers::window()?
        .document()
        .ok_or_else(|| ProbeError::unsupported("document"))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| ProbeError::Platform("TypeError: canvas element expected".into()))?;

    let context = match canvas.get_context("webgl")? {
        Some(ctx) => Some(ctx),
        None => canvas.get_context("experimental-webgl")?,
    };
    let gl = match context.and_then(|c| c.dyn_into::<WebGlRenderingContext>().ok()) {
        Some(gl) => gl,
        None => return Ok(json!({ "supported": false })),
    };

    let (vendor, renderer) = match gl.get_extension("WEBGL_debug_renderer_info")? {
        Some(_) => (
            gl.get_parameter(UNMASKED_VENDOR_WEBGL)?.as_string(),
            gl.get_parameter(UNMASKED_RENDERER_WEBGL)?.as_string(),
        ),
        None => (None, None),
    };

    Ok(json!({
        "supported": true,
        "vendor": vendor,
        "renderer": renderer,
    }))
}

fn non_empty(value: std::result::Result<String, JsValue>) -> Value {
    match value {
        Ok(s) if !s.is_empty() => Value::String(s),
        _ => Value::Null,
    }
}

#[async_trait(?Send)]
impl Probe for GpuUserAgentProbe {
    fn name(&self) -> &'static str {
        "gpu_ua"
    }

    fn vector(&self) -> &'static str {
        "gpu-ua"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let navigator = js_helpers::window()?.navigator();
        let mut data = ProbeData::new();
        data.insert("userAgent".into(), non_empty(navigator.user_agent()));
        data.insert("platform".into(), non_empty(navigator.platform()));
        data.insert("webgpu".into(), self.webgpu().await?);

        let webgl = match webgl() {
            Ok(v) => v,
            Err(e) => json!({ "error": e.to_string() }),
        };
        data.insert("webgl".into(), webgl);
        Ok(data)
    }
}
