//! Clock and timer seam for the probe runner
//!
//! Probes and the runner never touch timers directly. They go through
//! [`ProbeRuntime`] so that the browser implementation can use
//! `setTimeout`-backed futures while tests drive time by hand.

use futures::future::{FutureExt, LocalBoxFuture};
use web_time::{SystemTime, UNIX_EPOCH};

/// Time source and sleep provider.
///
/// Futures are `!Send`: everything runs on the browser event loop.
pub trait ProbeRuntime {
    /// Wall-clock time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    /// A future that completes after `millis` milliseconds.
    fn sleep(&self, millis: u32) -> LocalBoxFuture<'static, ()>;
}

/// Browser runtime backed by `Date.now()` and `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmRuntime;

impl WasmRuntime {
    pub fn new() -> Self {
        WasmRuntime
    }
}

impl ProbeRuntime for WasmRuntime {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn sleep(&self, millis: u32) -> LocalBoxFuture<'static, ()> {
        // Larger delays wrap to zero in `setTimeout`.
        let millis = millis.min(i32::MAX as u32);
        gloo_timers::future::TimeoutFuture::new(millis).boxed_local()
    }
}
