//! Warning / error message differences: the message and stack shape of a
//! locally thrown error and of a rejected promise.
//!
//! Errors are created and caught locally; nothing is reported anywhere.

use async_trait::async_trait;
use js_sys::{Function, Promise};
use serde_json::{json, Value};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::js_helpers;
use crate::error::{ProbeError, Result};
use crate::report::ProbeData;
use crate::runner::Probe;

pub const SYNC_MESSAGE: &str = "fp-demo-error";
pub const PROMISE_MESSAGE: &str = "fp-demo-promise";
pub const STACK_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Default)]
pub struct ErrorSignaturesProbe;

fn stack_snippet(err: &JsValue) -> String {
    js_helpers::get_string(err, "stack")
        .map(|s| js_helpers::truncate_chars(&s, STACK_SNIPPET_CHARS))
        .unwrap_or_default()
}

fn message_of(err: &JsValue) -> Value {
    json!(js_helpers::get_string(err, "message"))
}

/// A JS function that throws [`SYNC_MESSAGE`], built from source so the
/// engine produces its own stack. Fails on pages that forbid code
/// generation (CSP without `'unsafe-eval'`).
fn build_thrower() -> Result<Function> {
    let source = format!("(function() {{ throw new Error('{}'); }})", SYNC_MESSAGE);
    js_sys::eval(&source)?
        .dyn_into::<Function>()
        .map_err(|_| ProbeError::Platform("TypeError: thrower is not a function".into()))
}

/// Message and stack prefix of a synchronous throw, or `{ error }` when the
/// thrower could not be built or did not throw.
fn sync_signature(thrower: Result<Function>) -> Value {
    let thrower = match thrower {
        Ok(f) => f,
        Err(e) => return json!({ "error": e.to_string() }),
    };
    match thrower.call0(&JsValue::UNDEFINED) {
        Ok(_) => json!({ "error": "Error: thrower returned normally" }),
        Err(e) => json!({
            "message": message_of(&e),
            "stackStartsWith": stack_snippet(&e),
        }),
    }
}

async fn promise_signature() -> Result<Value> {
    let rejected = Promise::reject(&js_sys::Error::new(PROMISE_MESSAGE).into());
    match JsFuture::from(rejected).await {
        Ok(_) => Err(ProbeError::Platform("Error: rejected promise resolved".into())),
        Err(e) => Ok(json!({
            "message": message_of(&e),
            "stackSnippet": stack_snippet(&e),
        })),
    }
}

#[async_trait(?Send)]
impl Probe for ErrorSignaturesProbe {
    fn name(&self) -> &'static str {
        "error_signatures"
    }

    fn vector(&self) -> &'static str {
        "error-msg-signatures"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        data.insert("sync_error".into(), sync_signature(build_thrower()));

        let rejected = promise_signature()
            .await
            .unwrap_or_else(|e| json!({ "error": e.to_string() }));
        data.insert("promise_reject".into(), rejected);
        Ok(data)
    }
}
