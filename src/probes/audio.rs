//! Computation/timing differences: `performance.now()`, the navigation
//! timing entry and the wall time of a deterministic offline audio render.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{AudioBuffer, OfflineAudioContext, OscillatorType};

use super::js_helpers;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::{ProbeError, Result};
use crate::report::ProbeData;
use crate::runner::Probe;

const RENDER_CHANNELS: u32 = 1;
const RENDER_FRAMES: u32 = 4410;
const RENDER_SAMPLE_RATE: f32 = 44_100.0;
const OSCILLATOR_HZ: f32 = 440.0;

pub struct PerfOfflineAudioProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl PerfOfflineAudioProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }
}

fn navigation_entry() -> Result<Value> {
    let performance = match js_helpers::window()?.performance() {
        Some(p) => p,
        None => return Ok(Value::Null),
    };
    let entry = performance.get_entries_by_type("navigation").get(0);
    js_helpers::to_json(&entry)
}

/// Render 100ms of a 440Hz sine offline and time it.
async fn offline_render() -> Result<Value> {
    let ctx = OfflineAudioContext::new_with_number_of_channels_and_length_and_sample_rate(
        RENDER_CHANNELS,
        RENDER_FRAMES,
        RENDER_SAMPLE_RATE,
    )?;
    let osc = ctx.create_oscillator()?;
    osc.set_type(OscillatorType::Sine);
    osc.frequency().set_value(OSCILLATOR_HZ);
    osc.connect_with_audio_node(&ctx.destination())?;
    osc.start_with_when(0.0)?;

    let t0 = js_helpers::perf_now();
    let rendered = js_helpers::settle(ctx.start_rendering()?.into()).await?;
    let t1 = js_helpers::perf_now();

    let buffer: AudioBuffer = rendered.dyn_into().map_err(|_| {
        ProbeError::Platform("TypeError: startRendering did not yield an AudioBuffer".into())
    })?;

    Ok(json!({
        "renderMs": t1 - t0,
        "length": buffer.length(),
        "sampleRate": buffer.sample_rate(),
    }))
}

#[async_trait(?Send)]
impl Probe for PerfOfflineAudioProbe {
    fn name(&self) -> &'static str {
        "perf_offline_audio"
    }

    fn vector(&self) -> &'static str {
        "perf-offline-audio"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        data.insert("timing_now".into(), json!(js_helpers::perf_now()));
        data.insert("navigation".into(), navigation_entry()?);

        let offline = if self.caps.supports(Capability::OfflineAudio) {
            match offline_render().await {
                Ok(v) => v,
                Err(e) => json!({ "error": e.to_string() }),
            }
        } else {
            json!({ "supported": false })
        };
        data.insert("offlineAudio".into(), offline);
        Ok(data)
    }
}
