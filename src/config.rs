//! Runner configuration.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// Options accepted by the exported collection functions.
///
/// ```javascript
/// collectReport({ timeout_ms: 2000, only: ["gpu_ua", "permissions"] });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Upper bound for a single probe, in milliseconds.
    pub timeout_ms: u32,
    /// Restrict the run to these probe names. Empty means all.
    pub only: Vec<String>,
    /// Include probes that need a user activation (clipboard read).
    pub gesture_gated: bool,
}

impl RunnerConfig {
    pub const DEFAULT_TIMEOUT_MS: u32 = 5_000;
    /// Browsers treat `setTimeout` delays above `i32::MAX` as zero.
    pub const MAX_TIMEOUT_MS: u32 = i32::MAX as u32;

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms.min(Self::MAX_TIMEOUT_MS);
        self
    }

    /// Bring deserialized values into range.
    pub fn normalized(self) -> Self {
        let timeout_ms = self.timeout_ms;
        self.with_timeout_ms(timeout_ms)
    }

    pub fn with_only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_gesture_gated(mut self, gesture_gated: bool) -> Self {
        self.gesture_gated = gesture_gated;
        self
    }

    /// Whether a probe takes part in a run under this config.
    pub fn selects(&self, name: &str, requires_gesture: bool) -> bool {
        if requires_gesture && !self.gesture_gated {
            return false;
        }
        self.only.is_empty() || self.only.iter().any(|n| n == name)
    }

    /// Read options passed from JS. `undefined`/`null` and malformed input
    /// fall back to the defaults.
    pub fn from_js(options: JsValue) -> Self {
        if options.is_undefined() || options.is_null() {
            return Self::default();
        }
        match serde_wasm_bindgen::from_value::<Self>(options) {
            Ok(config) => config.normalized(),
            Err(e) => {
                log::warn!("Ignoring invalid probe options: {}", e);
                Self::default()
            }
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            only: Vec::new(),
            gesture_gated: false,
        }
    }
}
