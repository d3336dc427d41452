//! Platform capability queries
//!
//! Probes ask "is X here?" through [`PlatformCapabilities`] instead of
//! poking at globals ad hoc. [`BrowserCapabilities`] answers from the live
//! global object; tests can supply a fixed table.

use js_sys::Reflect;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// A platform feature a probe may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    CacheStorage,
    FileSystemAccess,
    WebGpu,
    WebGpuAdapter,
    OfflineAudio,
    ServiceWorker,
    CssTypedOm,
    CssUnitValue,
    DomMatrix,
    SubtleCrypto,
    TextCodec,
    Permissions,
    Geolocation,
    WebTransport,
    WebMl,
    ImageCapture,
    MediaDevices,
    ClipboardRead,
    ClipboardWrite,
}

impl Capability {
    /// Property path, starting at the global object, whose presence means
    /// the capability is exposed. Alternatives are listed where engines
    /// differ.
    pub fn paths(self) -> &'static [&'static [&'static str]] {
        match self {
            Capability::CacheStorage => &[&["caches", "keys"]],
            Capability::FileSystemAccess => &[&["showOpenFilePicker"]],
            Capability::WebGpu => &[&["navigator", "gpu"]],
            Capability::WebGpuAdapter => &[&["navigator", "gpu", "requestAdapter"]],
            Capability::OfflineAudio => &[&["OfflineAudioContext"]],
            Capability::ServiceWorker => &[&["navigator", "serviceWorker"]],
            Capability::CssTypedOm => &[&["CSS", "px"]],
            Capability::CssUnitValue => &[&["CSSUnitValue"]],
            Capability::DomMatrix => &[&["DOMMatrix"]],
            Capability::SubtleCrypto => &[&["crypto", "subtle", "digest"]],
            Capability::TextCodec => &[&["TextEncoder"], &["TextDecoder"]],
            Capability::Permissions => &[&["navigator", "permissions", "query"]],
            Capability::Geolocation => &[&["navigator", "geolocation"]],
            Capability::WebTransport => &[&["WebTransport"]],
            Capability::WebMl => &[&["ml"], &["ML"], &["MLGraphBuilder"]],
            Capability::ImageCapture => &[&["ImageCapture"]],
            Capability::MediaDevices => &[&["navigator", "mediaDevices"]],
            Capability::ClipboardRead => &[&["navigator", "clipboard", "readText"]],
            Capability::ClipboardWrite => &[&["navigator", "clipboard", "writeText"]],
        }
    }

    /// `TextCodec` needs both constructors; the others need any one path.
    fn requires_all_paths(self) -> bool {
        matches!(self, Capability::TextCodec)
    }
}

/// Answer to a capability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Support {
    Supported,
    Unsupported,
}

impl Support {
    pub fn is_supported(self) -> bool {
        self == Support::Supported
    }

    /// The `"present"` / `"absent"` wording used in reports.
    pub fn as_presence(self) -> &'static str {
        match self {
            Support::Supported => "present",
            Support::Unsupported => "absent",
        }
    }
}

impl From<bool> for Support {
    fn from(present: bool) -> Self {
        if present {
            Support::Supported
        } else {
            Support::Unsupported
        }
    }
}

pub trait PlatformCapabilities {
    fn query(&self, capability: Capability) -> Support;

    fn supports(&self, capability: Capability) -> bool {
        self.query(capability).is_supported()
    }
}

/// Capabilities of the hosting browser, read from `globalThis`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserCapabilities;

impl BrowserCapabilities {
    fn path_present(path: &[&str]) -> bool {
        let mut current: JsValue = js_sys::global().into();
        for segment in path {
            match Reflect::get(&current, &JsValue::from_str(segment)) {
                Ok(next) if !next.is_undefined() && !next.is_null() => current = next,
                _ => return false,
            }
        }
        true
    }
}

impl PlatformCapabilities for BrowserCapabilities {
    fn query(&self, capability: Capability) -> Support {
        let paths = capability.paths();
        let present = if capability.requires_all_paths() {
            paths.iter().all(|p| Self::path_present(p))
        } else {
            paths.iter().any(|p| Self::path_present(p))
        };
        Support::from(present)
    }
}

/// Fixed capability table.
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilities {
    supported: std::collections::BTreeSet<Capability>,
}

impl StaticCapabilities {
    pub fn new<I: IntoIterator<Item = Capability>>(supported: I) -> Self {
        Self {
            supported: supported.into_iter().collect(),
        }
    }
}

impl PlatformCapabilities for StaticCapabilities {
    fn query(&self, capability: Capability) -> Support {
        Support::from(self.supported.contains(&capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_table() {
        let caps = StaticCapabilities::new([Capability::WebGpu, Capability::DomMatrix]);
        assert!(caps.supports(Capability::WebGpu));
        assert!(caps.supports(Capability::DomMatrix));
        assert_eq!(caps.query(Capability::WebMl), Support::Unsupported);
    }

    #[test]
    fn test_presence_wording() {
        assert_eq!(Support::Supported.as_presence(), "present");
        assert_eq!(Support::Unsupported.as_presence(), "absent");
        assert_eq!(
            serde_json::to_value(Support::Unsupported).unwrap(),
            serde_json::json!("unsupported")
        );
    }

    #[test]
    fn test_every_capability_has_a_path() {
        for cap in [
            Capability::CacheStorage,
            Capability::FileSystemAccess,
            Capability::WebGpu,
            Capability::WebGpuAdapter,
            Capability::OfflineAudio,
            Capability::ServiceWorker,
            Capability::CssTypedOm,
            Capability::CssUnitValue,
            Capability::DomMatrix,
            Capability::SubtleCrypto,
            Capability::TextCodec,
            Capability::Permissions,
            Capability::Geolocation,
            Capability::WebTransport,
            Capability::WebMl,
            Capability::ImageCapture,
            Capability::MediaDevices,
            Capability::ClipboardRead,
            Capability::ClipboardWrite,
        ] {
            assert!(!cap.paths().is_empty(), "{:?}", cap);
        }
    }
}
