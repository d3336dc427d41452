//! # Browser Capability Probes
//!
//! A set of local-only browser capability probes compiled to WebAssembly.
//! Each probe inspects one vector (GPU, audio, cache storage, CSS Typed OM,
//! SubtleCrypto, permissions, ...), and the runner folds every result into
//! one JSON report keyed by probe name.
//!
//! ## Architecture
//!
//! ```text
//! collectReport (WASM export)
//!   ↓
//! ProbeRunner ── RunnerConfig (timeout, only, gesture_gated)
//!   ↓ join_all, one timer per probe
//! safe_call ── { vector, timestamp, data } | { error }
//!   ↓
//! Probe impls ── PlatformCapabilities / js_helpers
//! ```
//!
//! ## Guarantees
//!
//! - **Isolation**: one failing, hanging or panicking probe never affects
//!   the others
//! - **Stable shape**: every selected probe has a slot in the report
//! - **Local-only**: nothing is sent over the network or persisted

use std::cell::OnceCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

pub mod capabilities;
pub mod config;
mod error;
pub mod guard;
pub mod probes;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod summary;

pub use capabilities::{
    BrowserCapabilities, Capability, PlatformCapabilities, StaticCapabilities, Support,
};
pub use config::RunnerConfig;
pub use error::{describe_js_value, ProbeError, ProbeErrorKind, Result};
pub use guard::{safe_call, Guarded, ProbeFailure};
pub use probes::{default_runner, DEFAULT_PROBES};
pub use report::{AggregateReport, ProbeData, ProbeEnvelope, ProbeResult, ReportMeta};
pub use runner::{Probe, ProbeRunner};
pub use runtime::{ProbeRuntime, WasmRuntime};

thread_local! {
    // Shared across calls so the pointer listener armed by one run is
    // visible to the next.
    static RUNNER: OnceCell<Rc<ProbeRunner>> = const { OnceCell::new() };
}

#[wasm_bindgen(start)]
pub fn init() {
    // A second init (module re-instantiated) keeps the existing logger.
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Probe module initialized");
}

fn browser_runner() -> Result<Rc<ProbeRunner>> {
    RUNNER.with(|cell| {
        if let Some(runner) = cell.get() {
            return Ok(Rc::clone(runner));
        }
        let runner = Rc::new(default_runner(
            Rc::new(WasmRuntime::new()),
            Rc::new(BrowserCapabilities),
        )?);
        let _ = cell.set(Rc::clone(&runner));
        Ok(runner)
    })
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| ProbeError::Serialization(e.to_string()))
}

/// Run every selected probe and resolve to the aggregate report.
///
/// ```javascript
/// const report = await collectReport();
/// const gpuOnly = await collectReport({ only: ["gpu_ua"], timeout_ms: 2000 });
/// const withClipboard = await collectReport({ gesture_gated: true }); // inside a click handler
/// ```
#[wasm_bindgen(js_name = collectReport)]
pub async fn collect_report(options: JsValue) -> std::result::Result<JsValue, JsValue> {
    let config = RunnerConfig::from_js(options);
    let report = browser_runner()?.run_all(&config).await;
    Ok(to_js(&report)?)
}

/// Same as `collectReport`, rendered as indented JSON text.
#[wasm_bindgen(js_name = collectReportJson)]
pub async fn collect_report_json(options: JsValue) -> std::result::Result<String, JsValue> {
    let config = RunnerConfig::from_js(options);
    let report = browser_runner()?.run_all(&config).await;
    Ok(report.to_pretty_json()?)
}

/// Run one probe by report key. Unknown names resolve to `{ error }`.
///
/// Gesture gating does not apply here: naming a probe is the opt-in.
#[wasm_bindgen(js_name = runProbe)]
pub async fn run_probe(name: String, options: JsValue) -> std::result::Result<JsValue, JsValue> {
    let config = RunnerConfig::from_js(options);
    let result = browser_runner()?.run_one(&name, &config).await;
    Ok(to_js(&result)?)
}

/// Report keys of every registered probe.
#[wasm_bindgen(js_name = probeNames)]
pub fn probe_names() -> std::result::Result<js_sys::Array, JsValue> {
    let names = browser_runner()?
        .names()
        .into_iter()
        .map(JsValue::from_str)
        .collect();
    Ok(names)
}

/// One-line plain-text summary of a single probe result.
#[wasm_bindgen(js_name = summarize)]
pub fn summarize_result(result: JsValue) -> String {
    if result.is_undefined() || result.is_null() {
        return summary::summarize(None);
    }
    match serde_wasm_bindgen::from_value::<serde_json::Value>(result) {
        Ok(value) => summary::summarize(Some(&value)),
        Err(e) => {
            log::warn!("Cannot summarize result: {}", e);
            summary::summarize(None)
        }
    }
}

/// Write `text` to the clipboard. Call from a user gesture.
#[wasm_bindgen(js_name = copyToClipboard)]
pub async fn copy_to_clipboard(text: String) -> std::result::Result<(), JsValue> {
    probes::clipboard::write_text(&text).await?;
    log::info!("📋 Copied {} chars to clipboard", text.chars().count());
    Ok(())
}
