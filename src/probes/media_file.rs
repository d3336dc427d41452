//! File or media selection flows. These need explicit user consent, so only
//! their availability is probed; no camera, microphone or picker is opened.

use async_trait::async_trait;
use serde_json::json;
use std::rc::Rc;

use crate::capabilities::{Capability, PlatformCapabilities};
use crate::error::Result;
use crate::report::ProbeData;
use crate::runner::Probe;

pub struct MediaFileProbe {
    caps: Rc<dyn PlatformCapabilities>,
}

impl MediaFileProbe {
    pub fn new(caps: Rc<dyn PlatformCapabilities>) -> Self {
        Self { caps }
    }
}

#[async_trait(?Send)]
impl Probe for MediaFileProbe {
    fn name(&self) -> &'static str {
        "media_file"
    }

    fn vector(&self) -> &'static str {
        "media-file-selection"
    }

    async fn collect(&self) -> Result<ProbeData> {
        let mut data = ProbeData::new();
        data.insert(
            "imageCapture_supported".into(),
            json!(self.caps.supports(Capability::ImageCapture)),
        );
        data.insert(
            "filePicker_supported".into(),
            json!(self.caps.supports(Capability::FileSystemAccess)),
        );
        data.insert(
            "mediaDevices_supported".into(),
            json!(self.caps.supports(Capability::MediaDevices)),
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
    fn test_collect() {
        let caps = Rc::new(StaticCapabilities::new([Capability::FileSystemAccess]));
        let data = block_on(MediaFileProbe::new(caps).collect()).unwrap();
        assert_eq!(data["imageCapture_supported"], json!(false));
        assert_eq!(data["filePicker_supported"], json!(true));
        assert_eq!(data["mediaDevices_supported"], json!(false));
    }
}
