//! Error types for the probe runner
//!
//! Every failure a probe can hit collapses into one conceptual kind, a
//! Probe Failure. The enum below keeps enough structure to classify it
//! (absent capability, denied permission, timeout, ...) while its `Display`
//! output stays identical to what `String(e)` yields in the browser, so the
//! report shows the engine's own wording.

use js_sys::Reflect;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Classification for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeErrorKind {
    /// The platform does not expose the capability at all
    Unsupported,
    /// The capability exists but the user or the browser refused it
    Denied,
    /// The probe did not settle within its bound
    Timeout,
    /// Any other exception raised by the platform
    Platform,
    /// The probe panicked while running
    Panicked,
    /// No probe registered under the requested name
    NotFound,
    /// Duplicate or reserved probe name
    Registration,
    /// Result could not be converted to or from JSON
    Serialization,
}

/// Main error type for probes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("{0}")]
    Unsupported(String),

    #[error("{0}")]
    Denied(String),

    #[error("TimeoutError: probe {vector} did not settle within {timeout_ms}ms")]
    Timeout { vector: String, timeout_ms: u32 },

    #[error("{0}")]
    Platform(String),

    #[error("Error: {0}")]
    Panicked(String),

    #[error("collector not found: {0}")]
    UnknownProbe(String),

    #[error("probe name already registered: {0}")]
    DuplicateProbe(String),

    #[error("probe name is reserved: {0}")]
    ReservedName(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ProbeError {
    /// A capability that is missing from the hosting environment.
    pub fn unsupported(capability: &str) -> Self {
        ProbeError::Unsupported(format!(
            "NotSupportedError: {} is not available in this environment",
            capability
        ))
    }

    /// Convert a thrown or rejected JS value.
    ///
    /// `DOMException` names are used to pick the kind; the message is the
    /// same text `String(e)` produces.
    pub fn from_js(value: &JsValue) -> Self {
        let message = describe_js_value(value);
        let name = Reflect::get(value, &JsValue::from_str("name"))
            .ok()
            .and_then(|n| n.as_string());

        match name.as_deref() {
            Some("NotAllowedError") | Some("SecurityError") => ProbeError::Denied(message),
            Some("NotSupportedError") => ProbeError::Unsupported(message),
            _ => ProbeError::Platform(message),
        }
    }

    pub fn kind(&self) -> ProbeErrorKind {
        match self {
            ProbeError::Unsupported(_) => ProbeErrorKind::Unsupported,
            ProbeError::Denied(_) => ProbeErrorKind::Denied,
            ProbeError::Timeout { .. } => ProbeErrorKind::Timeout,
            ProbeError::Platform(_) => ProbeErrorKind::Platform,
            ProbeError::Panicked(_) => ProbeErrorKind::Panicked,
            ProbeError::UnknownProbe(_) => ProbeErrorKind::NotFound,
            ProbeError::DuplicateProbe(_) | ProbeError::ReservedName(_) => {
                ProbeErrorKind::Registration
            }
            ProbeError::Serialization(_) => ProbeErrorKind::Serialization,
        }
    }

    /// Whether a later run (e.g. after a user gesture or permission grant)
    /// could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProbeError::Denied(_) | ProbeError::Timeout { .. })
    }
}

#[wasm_bindgen]
extern "C" {
    /// The global `String` function.
    #[wasm_bindgen(catch, js_name = String)]
    fn js_string(value: &JsValue) -> std::result::Result<String, JsValue>;
}

/// Stringify a JS value with the engine's own `String(value)`.
///
/// An `Error("x")` becomes `"Error: x"` and a `DOMException` keeps its name
/// prefix. Values whose conversion throws (a hostile `toString`, a null
/// prototype object) fall back to their `typeof`.
pub fn describe_js_value(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    match js_string(value) {
        Ok(s) => s,
        Err(_) => format!(
            "[{} value]",
            value.js_typeof().as_string().unwrap_or_default()
        ),
    }
}

impl From<JsValue> for ProbeError {
    fn from(value: JsValue) -> Self {
        ProbeError::from_js(&value)
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::Serialization(err.to_string())
    }
}

impl From<ProbeError> for JsValue {
    fn from(err: ProbeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ProbeError::unsupported("WebGPU").kind(),
            ProbeErrorKind::Unsupported
        );
        assert_eq!(
            ProbeError::Timeout {
                vector: "gpu-ua".into(),
                timeout_ms: 10
            }
            .kind(),
            ProbeErrorKind::Timeout
        );
        assert_eq!(
            ProbeError::DuplicateProbe("gpu_ua".into()).kind(),
            ProbeErrorKind::Registration
        );
        assert_eq!(
            ProbeError::ReservedName("meta".into()).kind(),
            ProbeErrorKind::Registration
        );
        assert_eq!(
            ProbeError::UnknownProbe("nope".into()).kind(),
            ProbeErrorKind::NotFound
        );
    }

    #[test]
    fn test_platform_message_is_verbatim() {
        let err = ProbeError::Platform("Error: x".into());
        assert_eq!(err.to_string(), "Error: x");
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(
            ProbeError::unsupported("CacheStorage").to_string(),
            "NotSupportedError: CacheStorage is not available in this environment"
        );
        assert_eq!(
            ProbeError::Timeout {
                vector: "permissions-geo-notif".into(),
                timeout_ms: 250
            }
            .to_string(),
            "TimeoutError: probe permissions-geo-notif did not settle within 250ms"
        );
        assert_eq!(
            ProbeError::UnknownProbe("collect_nothing".into()).to_string(),
            "collector not found: collect_nothing"
        );
        assert_eq!(ProbeError::Panicked("boom".into()).to_string(), "Error: boom");
    }

    #[test]
    fn test_transient() {
        assert!(ProbeError::Denied("NotAllowedError: no".into()).is_transient());
        assert!(!ProbeError::unsupported("ML").is_transient());
        assert!(!ProbeError::Platform("TypeError: x".into()).is_transient());
    }

    #[test]
    fn test_from_serde_json() {
        let err: ProbeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ProbeErrorKind::Serialization);
    }
}
