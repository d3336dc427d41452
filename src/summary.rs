//! One-line summaries of probe results.
//!
//! Rules are checked in a fixed order against the result's `data` (or the
//! result itself when it has no `data`); the first matching rule wins.

use serde_json::Value;

const NO_SUMMARY: &str = "no safe summary available";

fn presence(flag: bool) -> &'static str {
    if flag {
        "present"
    } else {
        "absent"
    }
}

/// A feature flag reported either as a bare value or as `{ supported }`.
fn flag(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Object(map)) if map.contains_key("supported") => truthy(map.get("supported")),
        other => truthy(other),
    }
}

/// JS truthiness for JSON values.
fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

pub fn summarize(result: Option<&Value>) -> String {
    let result = match result {
        Some(v) if !v.is_null() => v,
        _ => return "no result".to_string(),
    };
    let d = result.get("data").filter(|d| d.is_object()).unwrap_or(result);
    let field = |name: &str| d.get(name);
    let nested = |outer: &str, inner: &str| d.get(outer).and_then(|o| o.get(inner));

    // The feature-flags probe reports `webgpu` as a bare bool; only the GPU
    // probe carries a `webgl` block or an object-shaped `webgpu`.
    if truthy(field("webgl")) || field("webgpu").map_or(false, Value::is_object) {
        return format!(
            "GPU feature: webgpu-{}, webgl-{}",
            presence(flag(field("webgpu"))),
            presence(truthy(nested("webgl", "supported")))
        );
    }
    if truthy(field("offlineAudio")) {
        return "OfflineAudio: supported".to_string();
    }
    if field("cache_support").is_some() {
        return format!(
            "Cache API: {}, File API: {}",
            presence(truthy(field("cache_support"))),
            presence(truthy(nested("file_api", "supported")))
        );
    }
    if field("cssUnitValue_supported").is_some() {
        return format!(
            "CSS Typed OM: {}, DOMMatrix: {}",
            presence(truthy(field("cssUnitValue_supported"))),
            presence(truthy(field("domMatrix")))
        );
    }
    if field("subtle_supported").is_some() {
        return format!(
            "SubtleCrypto: {}, TextEncoder: {}",
            presence(truthy(field("subtle_supported"))),
            presence(truthy(field("encoding_len")))
        );
    }
    if field("serviceWorker_supported").is_some() {
        let count_known = field("cache_count").map(|c| !c.is_null()).unwrap_or(false);
        return format!(
            "ServiceWorker: {}, Cache count known: {}",
            presence(truthy(field("serviceWorker_supported"))),
            if count_known { "yes" } else { "no" }
        );
    }
    if truthy(field("permissions")) {
        return "Permissions API: available".to_string();
    }
    if truthy(field("webTransport")) || truthy(field("ml")) {
        let transport = field("webTransport")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("absent");
        return format!(
            "Feature flags: webTransport-{}; webgpu-{}; ml-{}",
            transport,
            presence(flag(field("webgpu"))),
            presence(truthy(nested("ml", "supported")))
        );
    }
    if field("imageCapture_supported").is_some() {
        return format!(
            "Media/file pickers: imageCapture-{}; filePicker-{}",
            presence(truthy(field("imageCapture_supported"))),
            presence(truthy(field("filePicker_supported")))
        );
    }
    NO_SUMMARY.to_string()
}
