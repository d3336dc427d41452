//! Browser probe catalog
//!
//! One module per capability vector. Every probe reads platform state and
//! reports what it finds; none of them send anything off the page or
//! persist anything.
//!
//! ## Usage
//!
//! ```javascript
//! import init, { collectReport, probeNames } from './pkg/fp_probe_wasm.js';
//! await init();
//! console.log(probeNames());
//! const report = await collectReport({ timeout_ms: 3000 });
//! ```

use std::rc::Rc;

use crate::capabilities::PlatformCapabilities;
use crate::error::Result;
use crate::runner::ProbeRunner;
use crate::runtime::ProbeRuntime;

pub mod audio;
pub mod clipboard;
pub mod crypto_text;
pub mod css_dommatrix;
pub mod error_signatures;
pub mod feature_flags;
pub mod gpu;
pub mod input_clipboard;
pub mod js_helpers;
pub mod media_file;
pub mod os_files;
pub mod permissions;
pub mod service_worker;

pub use audio::PerfOfflineAudioProbe;
pub use clipboard::ClipboardReadProbe;
pub use crypto_text::CryptoTextProbe;
pub use css_dommatrix::CssDomMatrixProbe;
pub use error_signatures::ErrorSignaturesProbe;
pub use feature_flags::FeatureFlagsProbe;
pub use gpu::GpuUserAgentProbe;
pub use input_clipboard::{InputClipboardProbe, PointerSample, PointerTracker};
pub use media_file::MediaFileProbe;
pub use os_files::OsFilesCacheProbe;
pub use permissions::PermissionsProbe;
pub use service_worker::ServiceWorkerCacheProbe;

/// Report keys of the default catalog, in registration order.
pub const DEFAULT_PROBES: [&str; 12] = [
    "os_files_cache",
    "gpu_ua",
    "perf_offline_audio",
    "sw_cache",
    "css_dommatrix",
    "crypto_text",
    "error_signatures",
    "permissions",
    "feature_flags",
    "input_clipboard",
    "media_file",
    "clipboard_probe",
];

/// Build a runner with every probe registered.
pub fn default_runner(
    runtime: Rc<dyn ProbeRuntime>,
    caps: Rc<dyn PlatformCapabilities>,
) -> Result<ProbeRunner> {
    ProbeRunner::new(runtime)
        .with_probe(Box::new(OsFilesCacheProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(GpuUserAgentProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(PerfOfflineAudioProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(ServiceWorkerCacheProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(CssDomMatrixProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(CryptoTextProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(ErrorSignaturesProbe))?
        .with_probe(Box::new(PermissionsProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(FeatureFlagsProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(InputClipboardProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(MediaFileProbe::new(Rc::clone(&caps))))?
        .with_probe(Box::new(ClipboardReadProbe::new(caps)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::StaticCapabilities;
    use crate::runtime::WasmRuntime;

    #[test]
    fn test_default_catalog_order() {
        let runner = default_runner(
            Rc::new(WasmRuntime::new()),
            Rc::new(StaticCapabilities::default()),
        )
        .unwrap();
        assert_eq!(runner.names(), DEFAULT_PROBES.to_vec());
    }
}
