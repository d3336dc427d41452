//! Browser Probe WASM Integration Tests
//!
//! Run with: wasm-pack test --headless --chrome
//! (or --firefox)

#![cfg(target_arch = "wasm32")]

use js_sys::{Function, Reflect};
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

use fp_probe_wasm::probes::{
    CryptoTextProbe, CssDomMatrixProbe, GpuUserAgentProbe, OsFilesCacheProbe,
    PerfOfflineAudioProbe, PermissionsProbe, ServiceWorkerCacheProbe,
};
use fp_probe_wasm::{
    default_runner, describe_js_value, BrowserCapabilities, Capability, PlatformCapabilities,
    Probe, RunnerConfig, WasmRuntime, DEFAULT_PROBES,
};

wasm_bindgen_test_configure!(run_in_browser);

fn browser_caps() -> Rc<dyn PlatformCapabilities> {
    Rc::new(BrowserCapabilities)
}

fn browser_runner() -> fp_probe_wasm::ProbeRunner {
    default_runner(Rc::new(WasmRuntime::new()), Rc::new(BrowserCapabilities))
        .expect("default catalog registers cleanly")
}

// ===== Error text =====

#[wasm_bindgen_test]
fn error_value_described_like_string_coercion() {
    let err: JsValue = js_sys::Error::new("x").into();
    assert_eq!(describe_js_value(&err), "Error: x");
    assert_eq!(describe_js_value(&JsValue::from_str("plain")), "plain");
}

#[wasm_bindgen_test]
fn primitives_described_like_string_coercion() {
    assert_eq!(describe_js_value(&JsValue::from_f64(f64::INFINITY)), "Infinity");
    assert_eq!(describe_js_value(&JsValue::from_f64(1e21)), "1e+21");
    assert_eq!(describe_js_value(&JsValue::from_f64(0.5)), "0.5");
    assert_eq!(describe_js_value(&JsValue::NULL), "null");
    assert_eq!(describe_js_value(&JsValue::UNDEFINED), "undefined");
    assert_eq!(describe_js_value(&js_sys::eval("Symbol('s')").unwrap()), "Symbol(s)");
    assert_eq!(describe_js_value(&js_sys::eval("7n").unwrap()), "7");
}

#[wasm_bindgen_test]
fn throwing_to_string_falls_back_to_type() {
    let hostile = js_sys::eval("({ toString() { throw new Error('no'); } })").unwrap();
    assert_eq!(describe_js_value(&hostile), "[object value]");
}

// ===== safeCall =====

#[wasm_bindgen_test]
async fn safe_call_captures_throw() {
    let thrower = Function::new_no_args("throw new TypeError('nope');");
    let out = fp_probe_wasm::guard::safe_call_js(thrower).await;
    let error = Reflect::get(&out, &JsValue::from_str("error")).unwrap();
    assert_eq!(error.as_string().as_deref(), Some("TypeError: nope"));
}

#[wasm_bindgen_test]
async fn safe_call_awaits_promise() {
    let resolver = Function::new_no_args("return Promise.resolve(42);");
    let out = fp_probe_wasm::guard::safe_call_js(resolver).await;
    assert_eq!(out.as_f64(), Some(42.0));
}

#[wasm_bindgen_test]
async fn safe_call_captures_rejection() {
    let rejecter = Function::new_no_args("return Promise.reject(new Error('later'));");
    let out = fp_probe_wasm::guard::safe_call_js(rejecter).await;
    let error = Reflect::get(&out, &JsValue::from_str("error")).unwrap();
    assert_eq!(error.as_string().as_deref(), Some("Error: later"));
}

// ===== Capabilities =====

#[wasm_bindgen_test]
fn browser_has_dommatrix_and_text_codec() {
    let caps = BrowserCapabilities;
    assert!(caps.supports(Capability::DomMatrix));
    assert!(caps.supports(Capability::TextCodec));
}

// ===== Probes =====

#[wasm_bindgen_test]
async fn error_signatures_report_messages() {
    let data = fp_probe_wasm::probes::ErrorSignaturesProbe
        .collect()
        .await
        .unwrap();
    assert_eq!(data["sync_error"]["message"], json!("fp-demo-error"));
    assert_eq!(data["promise_reject"]["message"], json!("fp-demo-promise"));
}

#[wasm_bindgen_test]
async fn crypto_text_digest_matches_reference() {
    let data = CryptoTextProbe::new(browser_caps()).collect().await.unwrap();
    assert_eq!(data["text_roundtrip_ok"], json!(true));
    assert_eq!(data["subtle_supported"], json!(true));
    assert_eq!(data["subtle_digest_len"], json!(32));
    assert_eq!(data["subtle_digest_matches_reference"], json!(true));
}

#[wasm_bindgen_test]
async fn offline_audio_renders_fixed_length() {
    let data = PerfOfflineAudioProbe::new(browser_caps())
        .collect()
        .await
        .unwrap();
    assert!(data["timing_now"].as_f64().unwrap() >= 0.0);
    let offline = &data["offlineAudio"];
    assert_eq!(offline["length"], json!(4410));
    assert_eq!(offline["sampleRate"].as_f64(), Some(44_100.0));
    assert!(offline["renderMs"].as_f64().unwrap() >= 0.0);
}

#[wasm_bindgen_test]
async fn css_typed_om_and_identity_matrix() {
    let data = CssDomMatrixProbe::new(browser_caps())
        .collect()
        .await
        .unwrap();
    // Detected through CSS.px
    assert_eq!(data["cssUnitValue_supported"], json!(true));
    assert_eq!(data["css_example"]["toString"], json!("12px"));

    let matrix = &data["domMatrix"];
    assert_eq!(matrix["is2D"], json!(true));
    let identity = [("a", 1.0), ("b", 0.0), ("c", 0.0), ("d", 1.0), ("e", 0.0), ("f", 0.0)];
    for (field, expected) in identity {
        assert_eq!(matrix[field].as_f64(), Some(expected), "field {}", field);
    }
}

#[wasm_bindgen_test]
async fn gpu_reports_webgl_shape() {
    let data = GpuUserAgentProbe::new(browser_caps())
        .collect()
        .await
        .unwrap();
    assert!(data["userAgent"].is_string());
    assert!(data["webgpu"].get("supported").is_some());

    let webgl = data["webgl"].as_object().unwrap();
    match webgl.get("supported") {
        Some(serde_json::Value::Bool(true)) => {
            assert!(webgl.contains_key("vendor"));
            assert!(webgl.contains_key("renderer"));
        }
        Some(serde_json::Value::Bool(false)) => assert_eq!(webgl.len(), 1),
        other => panic!("unexpected webgl shape: {:?} in {:?}", other, webgl),
    }
}

#[wasm_bindgen_test]
async fn cache_storage_is_enumerated() {
    let caps = browser_caps();
    assert!(caps.supports(Capability::CacheStorage));

    let files = OsFilesCacheProbe::new(Rc::clone(&caps))
        .collect()
        .await
        .unwrap();
    assert_eq!(files["cache_support"], json!(true));
    assert!(files["cache_names"].is_array(), "{}", files["cache_names"]);

    let sw = ServiceWorkerCacheProbe::new(caps).collect().await.unwrap();
    assert!(sw["cache_count"].is_u64(), "{:?}", sw);
    assert!(sw["cache_names"].is_array());
    assert_eq!(sw["serviceWorker_supported"], json!(true));
}

#[wasm_bindgen_test]
async fn permission_states_are_strings() {
    let data = PermissionsProbe::new(browser_caps())
        .collect()
        .await
        .unwrap();
    let states = &data["permissions"];
    for name in ["geolocation", "notifications"] {
        assert!(states[name].is_string(), "{} state: {}", name, states);
    }
    assert!(data["geolocation_supported"].is_boolean());
}

// ===== Aggregate report =====

#[wasm_bindgen_test]
async fn report_has_slot_for_every_ungated_probe() {
    let runner = browser_runner();
    let report = runner
        .run_all(&RunnerConfig::default().with_timeout_ms(3_000))
        .await;

    let expected: Vec<&str> = DEFAULT_PROBES
        .iter()
        .copied()
        .filter(|name| *name != "clipboard_probe")
        .collect();
    let mut names = report.probe_names();
    names.sort_unstable();
    let mut expected_sorted = expected.clone();
    expected_sorted.sort_unstable();
    assert_eq!(names, expected_sorted);

    let value = report.to_value().unwrap();
    assert_eq!(value["meta"]["note"], json!("Local-only; no network."));
    for name in expected {
        let slot = &value[name];
        let is_envelope = slot.get("vector").is_some() && slot.get("data").is_some();
        let is_failure = slot.get("error").is_some();
        assert!(is_envelope ^ is_failure, "{} has mixed shape: {}", name, slot);
    }
}

#[wasm_bindgen_test]
async fn run_probe_unknown_name() {
    let out = fp_probe_wasm::run_probe("nope".into(), JsValue::UNDEFINED)
        .await
        .unwrap();
    let error = Reflect::get(&out, &JsValue::from_str("error")).unwrap();
    assert_eq!(error.as_string().as_deref(), Some("collector not found: nope"));
}

#[wasm_bindgen_test]
fn summarize_null_result() {
    assert_eq!(fp_probe_wasm::summarize_result(JsValue::NULL), "no result");
}
