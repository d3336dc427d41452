//! Differing constants and enumerations: CSS Typed OM value formatting and
//! DOMMatrix defaults.

use async_trait::async_trait;
use js_sys::Array;
use serde_json::{json, Map, Value};
use std::rc::Rc;
use wasm_bindgen::JsValue;

use super::js_helpers;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::{describe_js_value, ProbeError, Result};
use crate::report::ProbeData;
use crate::runner::Probe;

const MATRIX_FIELDS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

pub struct CssDomMatrixProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl CssDomMatrixProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }

    fn css_typed(&self, data: &mut ProbeData) -> Result<()> {
        if !self.caps.supports(Capability::CssTypedOm) {
            data.insert("css_typed_supported".into(), json!(false));
            return Ok(());
        }

        let unit_value = self.caps.supports(Capability::CssUnitValue);
        data.insert("cssUnitValue_supported".into(), json!(unit_value));
        if unit_value {
            let args = Array::of2(&JsValue::from_f64(12.0), &JsValue::from_str("px"));
            let value = js_helpers::construct("CSSUnitValue", &args)?;
            data.insert(
                "css_example".into(),
                json!({
                    "value": 12,
                    "unit": "px",
                    "toString": describe_js_value(&value),
                }),
            );
        }
        Ok(())
    }
}

/// Identity 2D matrix as the engine reports it.
fn identity_matrix() -> Result<Value> {
    let init = Array::new();
    for v in [1.0, 0.0, 0.0, 1.0, 0.0, 0.0] {
        init.push(&JsValue::from_f64(v));
    }
    let matrix = js_helpers::construct("DOMMatrix", &Array::of1(&init))?;

    let mut out = Map::new();
    out.insert(
        "is2D".into(),
        json!(js_helpers::get_bool(&matrix, "is2D")
            .ok_or_else(|| ProbeError::Platform("TypeError: DOMMatrix.is2D missing".into()))?),
    );
    for field in MATRIX_FIELDS {
        out.insert(field.into(), json!(js_helpers::get_f64(&matrix, field)));
    }
    Ok(Value::Object(out))
}

#[async_trait(?Send)]
impl Probe for CssDomMatrixProbe {
    fn name(&self) -> &'static str {
        "css_dommatrix"
    }

    fn vector(&self) -> &'static str {
        "css-dommatrix"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        if let Err(e) = self.css_typed(&mut data) {
            data.insert("css_error".into(), json!(e.to_string()));
        }

        let matrix = if self.caps.supports(Capability::DomMatrix) {
            identity_matrix().unwrap_or_else(|e| json!({ "error": e.to_string() }))
        } else {
            json!({ "error": ProbeError::unsupported("DOMMatrix").to_string() })
        };
        data.insert("domMatrix".into(), matrix);
        Ok(data)
    }
}
