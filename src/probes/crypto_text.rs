//! Native library / engine behavior: SubtleCrypto digest timing and text
//! codec round-trips.
//!
//! No keys are generated or exported. The digest input is a fixed string and
//! the platform result is cross-checked against a `sha2` reference.

use async_trait::async_trait;
use js_sys::{Array, ArrayBuffer, Uint8Array};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};

use super::js_helpers;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::{ProbeError, Result};
use crate::report::ProbeData;
use crate::runner::Probe;

pub const DIGEST_INPUT: &str = "test-string-for-hash";
pub const TEXT_SAMPLE: &str = "𝌆 Unicode test 🤖 — long-ish string to measure";

pub struct CryptoTextProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl CryptoTextProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }
}

/// Hex SHA-256 of [`DIGEST_INPUT`] computed in Rust.
pub fn reference_digest_hex() -> String {
    hex::encode(Sha256::digest(DIGEST_INPUT.as_bytes()))
}

struct DigestRun {
    elapsed_ms: f64,
    bytes: Vec<u8>,
}

async fn subtle_digest() -> Result<DigestRun> {
    let subtle = js_helpers::window()?.crypto()?.subtle();
    let input = Uint8Array::from(DIGEST_INPUT.as_bytes());

    let t0 = js_helpers::perf_now();
    let pending = subtle.digest_with_str_and_buffer_source("SHA-256", &input)?;
    let digest = js_helpers::settle(pending.into()).await?;
    let t1 = js_helpers::perf_now();

    let buffer: ArrayBuffer = digest.dyn_into().map_err(|_| {
        ProbeError::Platform("TypeError: digest did not yield an ArrayBuffer".into())
    })?;
    Ok(DigestRun {
        elapsed_ms: t1 - t0,
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}

struct TextRun {
    elapsed_ms: f64,
    round_trip_ok: bool,
    encoded_len: u32,
}

fn text_round_trip() -> Result<TextRun> {
    let encoder = js_helpers::construct("TextEncoder", &Array::new())?;
    let decoder = js_helpers::construct("TextDecoder", &Array::new())?;

    let t0 = js_helpers::perf_now();
    let encoded = js_helpers::call_method(
        &encoder,
        "encode",
        &Array::of1(&JsValue::from_str(TEXT_SAMPLE)),
    )?;
    let decoded = js_helpers::call_method(&decoder, "decode", &Array::of1(&encoded))?;
    let t1 = js_helpers::perf_now();

    Ok(TextRun {
        elapsed_ms: t1 - t0,
        round_trip_ok: decoded.as_string().as_deref() == Some(TEXT_SAMPLE),
        encoded_len: js_helpers::get_f64(&encoded, "length").unwrap_or(0.0) as u32,
    })
}

#[async_trait(?Send)]
impl Probe for CryptoTextProbe {
    fn name(&self) -> &'static str {
        "crypto_text"
    }

    fn vector(&self) -> &'static str {
        "crypto-text-bench"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();

        if self.caps.supports(Capability::SubtleCrypto) {
            data.insert("subtle_supported".into(), json!(true));
            match subtle_digest().await {
                Ok(run) => {
                    data.insert("subtle_digest_time_ms".into(), json!(run.elapsed_ms));
                    data.insert("subtle_digest_len".into(), json!(run.bytes.len()));
                    data.insert(
                        "subtle_digest_matches_reference".into(),
                        json!(hex::encode(&run.bytes) == reference_digest_hex()),
                    );
                }
                Err(e) => {
                    data.insert("subtle_error".into(), json!(e.to_string()));
                }
            }
        } else {
            data.insert("subtle_supported".into(), json!(false));
        }

        if self.caps.supports(Capability::TextCodec) {
            match text_round_trip() {
                Ok(run) => {
                    data.insert("text_roundtrip_ms".into(), json!(run.elapsed_ms));
                    data.insert("text_roundtrip_ok".into(), json!(run.round_trip_ok));
                    data.insert("encoding_len".into(), json!(run.encoded_len));
                }
                Err(e) => {
                    data.insert("text_error".into(), json!(e.to_string()));
                }
            }
        } else {
            data.insert(
                "text_error".into(),
                json!(ProbeError::unsupported("TextEncoder").to_string()),
            );
        }
        Ok(data)
    }
}
