//! Probe result envelopes and the aggregate report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::guard::Guarded;

/// Free-form data a probe collected, keyed by field name.
pub type ProbeData = serde_json::Map<String, serde_json::Value>;

/// Successful probe output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeEnvelope {
    pub vector: String,
    /// Epoch milliseconds at invocation time.
    pub timestamp: u64,
    pub data: ProbeData,
}

/// One slot of the report: an envelope or `{ error }`.
pub type ProbeResult = Guarded<ProbeEnvelope>;

/// Report-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub note: String,
    pub time: u64,
    pub timeout_ms: u32,
    pub probe_count: usize,
    pub failed_count: usize,
}

impl ReportMeta {
    pub const NOTE: &'static str = "Local-only; no network.";
}

/// Name reserved for [`ReportMeta`] at the top level of the report.
pub const META_KEY: &str = "meta";

/// All probe results from one run, flattened beside `meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub meta: ReportMeta,
    #[serde(flatten)]
    pub outputs: BTreeMap<String, ProbeResult>,
}

impl AggregateReport {
    pub fn new(time: u64, timeout_ms: u32, outputs: BTreeMap<String, ProbeResult>) -> Self {
        let failed_count = outputs.values().filter(|r| r.is_failure()).count();
        Self {
            meta: ReportMeta {
                note: ReportMeta::NOTE.to_string(),
                time,
                timeout_ms,
                probe_count: outputs.len(),
                failed_count,
            },
            outputs,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.outputs.get(name)
    }

    /// Probe names present in the report, in key order.
    pub fn probe_names(&self) -> Vec<&str> {
        self.outputs.keys().map(String::as_str).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outputs.iter().filter_map(|(name, result)| {
            result.failure().map(|f| (name.as_str(), f.error.as_str()))
        })
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Formatted text for display.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
