//! Input / gesture-driven signals: clipboard availability and pointer event
//! timing.
//!
//! The first run arms a `pointerdown` listener and reports no pointer; runs
//! after the user has touched the page report the last pointer seen.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

use super::js_helpers;
use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::Result;
use crate::report::ProbeData;
use crate::runner::Probe;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointerSample {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "clientX")]
    pub client_x: i32,
    #[serde(rename = "clientY")]
    pub client_y: i32,
    pub time: f64,
}

/// Remembers the most recent `pointerdown` on the window.
#[derive(Default)]
pub struct PointerTracker {
    last: Rc<RefCell<Option<PointerSample>>>,
    armed: Cell<bool>,
}

impl PointerTracker {
    /// Install the listener once. Later calls are no-ops.
    pub fn arm(&self) -> Result<()> {
        if self.armed.get() {
            return Ok(());
        }
        let window = js_helpers::window()?;
        let last = Rc::clone(&self.last);
        let listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                *last.borrow_mut() = Some(PointerSample {
                    kind: event.type_(),
                    client_x: mouse.client_x(),
                    client_y: mouse.client_y(),
                    time: event.time_stamp(),
                });
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        window.add_event_listener_with_callback(
            "pointerdown",
            listener.as_ref().unchecked_ref(),
        )?;
        // Lives for the page lifetime.
        listener.forget();
        self.armed.set(true);
        log::debug!("Pointer listener armed");
        Ok(())
    }

    pub fn last(&self) -> Option<PointerSample> {
        self.last.borrow().clone()
    }

    pub fn record(&self, sample: PointerSample) {
        *self.last.borrow_mut() = Some(sample);
    }
}

pub struct InputClipboardProbe {
    caps: Rc<dyn PlatformCapabilities>,
    pointer: PointerTracker,
}

impl InputClipboardProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self {
            caps,
            pointer: PointerTracker::default(),
        }
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }
}

#[async_trait(?Send)]
impl Probe for InputClipboardProbe {
    fn name(&self) -> &'static str {
        "input_clipboard"
    }

    fn vector(&self) -> &'static str {
        "input-clipboard"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        data.insert("gesture_required".into(), json!(true));
        data.insert(
            "note".into(),
            json!("Perform a pointer gesture on the page, then re-run to capture pointer timing."),
        );
        data.insert(
            "clipboard".into(),
            json!({
                "read_supported": self.caps.supports(Capability::ClipboardRead),
                "write_supported": self.caps.supports(Capability::ClipboardWrite),
            }),
        );

        let last = self.pointer.last();
        if last.is_none() {
            self.pointer.arm()?;
        }
        data.insert("last_pointer".into(), serde_json::to_value(last)?);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::StaticCapabilities;
    use futures::executor::block_on;

    #[test]
    fn test_reports_recorded_pointer() {
        let caps = Rc::new(StaticCapabilities::new([Capability::ClipboardWrite]));
        let probe = InputClipboardProbe::new(caps);
        probe.pointer().record(PointerSample {
            kind: "pointerdown".into(),
            client_x: 10,
            client_y: 20,
            time: 1234.5,
        });

        let data = block_on(probe.collect()).unwrap();
        assert_eq!(data["gesture_required"], json!(true));
        assert_eq!(
            data["clipboard"],
            json!({"read_supported": false, "write_supported": true})
        );
        assert_eq!(
            data["last_pointer"],
            json!({"type": "pointerdown", "clientX": 10, "clientY": 20, "time": 1234.5})
        );
    }
}
