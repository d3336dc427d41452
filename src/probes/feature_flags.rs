//! Runtime features that need a secure context or a flag: WebTransport,
//! WebGPU and WebNN. Presence only, no network.

use async_trait::async_trait;
use serde_json::json;
use std::rc::Rc;

use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::Result;
use crate::report::ProbeData;
use crate::runner::Probe;

pub struct FeatureFlagsProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl FeatureFlagsProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }
}

#[async_trait(?Send)]
impl Probe for FeatureFlagsProbe {
    fn name(&self) -> &'static str {
        "feature_flags"
    }

    fn vector(&self) -> &'static str {
        "feature-flags"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        data.insert(
            "webTransport".into(),
            json!(self.caps.query(Capability::WebTransport).as_presence()),
        );
        data.insert(
            "webgpu".into(),
            json!(self.caps.supports(Capability::WebGpuAdapter)),
        );
        data.insert(
            "ml".into(),
            json!({ "supported": self.caps.supports(Capability::WebMl) }),
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::StaticCapabilities;
    use futures::executor::block_on;

    #[test]
    fn test_flags_follow_capabilities() {
        let caps = Rc::new(StaticCapabilities::new([
            Capability::WebTransport,
            Capability::WebGpu,
        ]));
        let data = block_on(FeatureFlagsProbe::new(caps).collect()).unwrap();

        assert_eq!(data["webTransport"], json!("present"));
        // navigator.gpu without requestAdapter does not count
        assert_eq!(data["webgpu"], json!(false));
        assert_eq!(data["ml"], json!({"supported": false}));
    }
}
