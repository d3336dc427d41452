//! Reflect-based helpers for reading platform objects.
//!
//! Most of what the probes inspect is optional or experimental, so it is
//! reached through `Reflect` rather than typed `web-sys` bindings: a missing
//! property is an answer, not an error.

use js_sys::{Array, Function, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{ProbeError, Result};

/// The browser window, or `Unsupported` in worker/non-browser hosts.
pub fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| ProbeError::unsupported("window"))
}

/// Get a property from the global scope.
pub fn get_global(prop: &str) -> Result<JsValue> {
    Ok(Reflect::get(&js_sys::global(), &JsValue::from_str(prop))?)
}

/// Get `obj[prop]`. Non-objects and throwing getters read as `undefined`.
pub fn get(obj: &JsValue, prop: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(prop)).unwrap_or(JsValue::UNDEFINED)
}

/// Whether `obj[prop]` is neither `undefined` nor `null`.
pub fn has(obj: &JsValue, prop: &str) -> bool {
    let v = get(obj, prop);
    !v.is_undefined() && !v.is_null()
}

pub fn get_string(obj: &JsValue, prop: &str) -> Option<String> {
    get(obj, prop).as_string()
}

pub fn get_f64(obj: &JsValue, prop: &str) -> Option<f64> {
    get(obj, prop).as_f64()
}

pub fn get_bool(obj: &JsValue, prop: &str) -> Option<bool> {
    get(obj, prop).as_bool()
}

/// Call `obj[method](...args)` with `obj` as `this`.
pub fn call_method(obj: &JsValue, method: &str, args: &Array) -> Result<JsValue> {
    let func: Function = get(obj, method)
        .dyn_into()
        .map_err(|_| ProbeError::unsupported(method))?;
    Ok(Reflect::apply(&func, obj, args)?)
}

/// `new globalThis[ctor](...args)`.
pub fn construct(ctor: &str, args: &Array) -> Result<JsValue> {
    let ctor_fn: Function = get_global(ctor)?
        .dyn_into()
        .map_err(|_| ProbeError::unsupported(ctor))?;
    Ok(Reflect::construct(&ctor_fn, args)?)
}

/// Await a value that may or may not be a Promise.
pub async fn settle(value: JsValue) -> Result<JsValue> {
    let promise = Promise::resolve(&value);
    Ok(JsFuture::from(promise).await?)
}

/// `performance.now()`, or 0 when there is no Performance object.
pub fn perf_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Round-trip a JS value through `JSON.stringify`, honoring `toJSON`.
/// Values JSON cannot represent come back as `null`.
pub fn to_json(value: &JsValue) -> Result<Value> {
    if value.is_undefined() {
        return Ok(Value::Null);
    }
    let text = js_sys::JSON::stringify(value)?;
    match text.as_string() {
        Some(s) => Ok(serde_json::from_str(&s)?),
        None => Ok(Value::Null),
    }
}

/// An array of strings, truncated to `limit` entries.
pub fn string_list(value: &JsValue, limit: usize) -> Vec<Value> {
    if !Array::is_array(value) {
        return Vec::new();
    }
    let arr: &Array = value.unchecked_ref();
    arr.iter()
        .take(limit)
        .map(|item| match item.as_string() {
            Some(s) => Value::String(s),
            None => Value::Null,
        })
        .collect()
}

/// First `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
