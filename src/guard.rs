//! Safe-probe wrapper
//!
//! [`safe_call`] runs an operation that may fail in any way the platform
//! allows (an `Err`, a panic while building the future, a panic while
//! polling it) and always hands back a value: either the operation's own
//! result, untouched, or a [`ProbeFailure`] carrying the failure as text.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::ProbeError;

/// The `{ error: string }` shape a failed probe collapses into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFailure {
    pub error: String,
}

impl ProbeFailure {
    /// Never produces an empty `error`.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let error = if message.trim().is_empty() {
            "Error".to_string()
        } else {
            message
        };
        ProbeFailure { error }
    }
}

impl From<&ProbeError> for ProbeFailure {
    fn from(err: &ProbeError) -> Self {
        ProbeFailure::new(err.to_string())
    }
}

/// Outcome of a guarded call. Serializes untagged, so a success is the
/// value itself and a failure is exactly `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Guarded<T> {
    Failed(ProbeFailure),
    Value(T),
}

impl<T> Guarded<T> {
    pub fn is_failure(&self) -> bool {
        matches!(self, Guarded::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Guarded::Value(v) => Some(v),
            Guarded::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ProbeFailure> {
        match self {
            Guarded::Failed(f) => Some(f),
            Guarded::Value(_) => None,
        }
    }
}

/// Invoke `op` and capture whatever it produces.
///
/// Never panics and never returns an error to the caller.
pub async fn safe_call<F, Fut, T>(op: F) -> Guarded<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ProbeError>>,
{
    let fut = match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(fut) => fut,
        Err(payload) => return Guarded::Failed(panic_failure(payload)),
    };

    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(value)) => Guarded::Value(value),
        Ok(Err(err)) => Guarded::Failed(ProbeFailure::from(&err)),
        Err(payload) => Guarded::Failed(panic_failure(payload)),
    }
}

fn panic_failure(payload: Box<dyn Any + Send>) -> ProbeFailure {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "probe panicked".to_string()
    };
    ProbeFailure::from(&ProbeError::Panicked(message))
}

/// JS-facing wrapper: call `f`, await it if it returned a Promise, and
/// resolve to its value or to `{ error: String(e) }`.
///
/// ```javascript
/// const out = await safeCall(() => navigator.gpu.requestAdapter());
/// ```
#[wasm_bindgen(js_name = safeCall)]
pub async fn safe_call_js(f: js_sys::Function) -> JsValue {
    let outcome = safe_call(|| async move {
        let value = f.call0(&JsValue::UNDEFINED).map_err(ProbeError::from)?;
        if value.has_type::<js_sys::Promise>() {
            let promise: js_sys::Promise = value.unchecked_into();
            JsFuture::from(promise).await.map_err(ProbeError::from)
        } else {
            Ok(value)
        }
    })
    .await;

    match outcome {
        Guarded::Value(v) => v,
        Guarded::Failed(failure) => failure_to_js(&failure),
    }
}

/// Build the `{ error }` object without going through serde.
pub fn failure_to_js(failure: &ProbeFailure) -> JsValue {
    let obj = js_sys::Object::new();
    // Setting a string key on a fresh object cannot throw.
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("error"),
        &JsValue::from_str(&failure.error),
    );
    obj.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_success_passes_value_through() {
        let out = block_on(safe_call(|| async { Ok::<_, ProbeError>(json!({"a": 1})) }));
        assert_eq!(out, Guarded::Value(json!({"a": 1})));
    }

    #[test]
    fn test_error_becomes_failure() {
        let out: Guarded<u32> =
            block_on(safe_call(|| async { Err(ProbeError::Platform("Error: x".into())) }));
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({ "error": "Error: x" })
        );
    }

    #[test]
    fn test_sync_panic_is_contained() {
        type Never = futures::future::Ready<Result<u32, ProbeError>>;
        let out: Guarded<u32> = block_on(safe_call(|| -> Never { panic!("thrown before any await") }));
        assert_eq!(
            out.failure().map(|f| f.error.as_str()),
            Some("Error: thrown before any await")
        );
    }

    #[test]
    fn test_async_panic_is_contained() {
        let out: Guarded<u32> = block_on(safe_call(|| async {
            let reason = futures::future::ready(String::from("rejected later")).await;
            if !reason.is_empty() {
                panic!("{}", reason);
            }
            Ok::<u32, ProbeError>(0)
        }));
        assert_eq!(
            out.failure().map(|f| f.error.as_str()),
            Some("Error: rejected later")
        );
    }

    #[test]
    fn test_failure_text_never_empty() {
        let out: Guarded<u32> =
            block_on(safe_call(|| async { Err(ProbeError::Platform(String::new())) }));
        assert_eq!(out.failure().map(|f| f.error.as_str()), Some("Error"));
        assert_eq!(ProbeFailure::new("   ").error, "Error");
    }

    #[test]
    fn test_failure_serializes_to_single_key() {
        let failure = ProbeFailure::new("TypeError: nope");
        let v = serde_json::to_value(Guarded::<u32>::Failed(failure)).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["error"], "TypeError: nope");
    }
}
