//! Clipboard access. Reading needs a user activation, so the read probe
//! only runs when the caller opts into gesture-gated probes. The clipboard
//! contents themselves never leave this module: only success and length are
//! reported.

use async_trait::async_trait;
use js_sys::Array;
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::JsValue;

use super::js_helpers;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::{ProbeError, Result};
use crate::report::ProbeData;
use crate::runner::Probe;

fn clipboard() -> Result<JsValue> {
    let navigator: JsValue = js_helpers::window()?.navigator().into();
    let clipboard = js_helpers::get(&navigator, "clipboard");
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(ProbeError::unsupported("navigator.clipboard"));
    }
    Ok(clipboard)
}

/// Write `text` to the clipboard. Must be called from a user gesture.
pub async fn write_text(text: &str) -> Result<()> {
    let pending = js_helpers::call_method(
        &clipboard()?,
        "writeText",
        &Array::of1(&JsValue::from_str(text)),
    )?;
    js_helpers::settle(pending).await?;
    Ok(())
}

async fn read_text_len() -> Result<usize> {
    let pending = js_helpers::call_method(&clipboard()?, "readText", &Array::new())?;
    let text = js_helpers::settle(pending).await?;
    // UTF-16 code units, like String.length
    Ok(text.as_string().map(|s| s.encode_utf16().count()).unwrap_or(0))
}

pub struct ClipboardReadProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl ClipboardReadProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }
}

#[async_trait(?Send)]
impl Probe for ClipboardReadProbe {
    fn name(&self) -> &'static str {
        "clipboard_probe"
    }

    fn vector(&self) -> &'static str {
        "clipboard-read"
    }

    fn requires_gesture(&self) -> bool {
        true
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        if !self.caps.supports(Capability::ClipboardRead) {
            data.insert("success".into(), json!(false));
            return Ok(data);
        }

        // A denied or empty read is a result, not a failure.
        match read_text_len().await {
            Ok(len) if len > 0 => {
                data.insert("success".into(), json!(true));
                data.insert("length".into(), json!(len));
            }
            Ok(_) => {
                data.insert("success".into(), json!(false));
            }
            Err(e) => {
                log::debug!("Clipboard read refused: {}", e);
                data.insert("success".into(), json!(false));
            }
        }
        Ok(data)
    }
}
