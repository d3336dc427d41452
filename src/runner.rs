//! Probe trait and the aggregating runner
//!
//! The runner owns an ordered list of probes, fans out to every selected
//! one concurrently, bounds each with a timeout, and folds the results into
//! an [`AggregateReport`]. A probe can fail in any way it likes; the failure
//! ends up as `{ error }` in its own slot and nothing else is affected.

use async_trait::async_trait;
use futures::future::{join_all, FutureExt};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::RunnerConfig;
use crate::error::{ProbeError, Result};
use crate::guard::{safe_call, Guarded, ProbeFailure};
use crate::report::{AggregateReport, ProbeData, ProbeEnvelope, ProbeResult, META_KEY};
use crate::runtime::ProbeRuntime;

/// A single capability check against the hosting platform.
#[async_trait(?Send)]
pub trait Probe {
    /// Key under which the result lands in the report (`gpu_ua`).
    fn name(&self) -> &'static str;

    /// Vector tag carried inside the envelope (`gpu-ua`).
    fn vector(&self) -> &'static str;

    /// Probes that need a user activation are skipped unless the run
    /// opts in.
    fn requires_gesture(&self) -> bool {
        false
    }

    async fn collect(&self) -> Result<ProbeData>;
}

pub struct ProbeRunner {
    runtime: Rc<dyn ProbeRuntime>,
    probes: Vec<Box<dyn Probe>>,
}

impl ProbeRunner {
    pub fn new(runtime: Rc<dyn ProbeRuntime>) -> Self {
        Self {
            runtime,
            probes: Vec::new(),
        }
    }

    /// Add a probe. Names must be unique and must not collide with the
    /// report's `meta` slot.
    pub fn register(&mut self, probe: Box<dyn Probe>) -> Result<()> {
        let name = probe.name();
        if name == META_KEY {
            return Err(ProbeError::ReservedName(name.to_string()));
        }
        if self.probes.iter().any(|p| p.name() == name) {
            return Err(ProbeError::DuplicateProbe(name.to_string()));
        }
        self.probes.push(probe);
        Ok(())
    }

    pub fn with_probe(mut self, probe: Box<dyn Probe>) -> Result<Self> {
        self.register(probe)?;
        Ok(self)
    }

    /// Registered probe names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Names in `config.only` that match no registered probe.
    pub fn unknown_names<'c>(&self, config: &'c RunnerConfig) -> Vec<&'c str> {
        config
            .only
            .iter()
            .map(String::as_str)
            .filter(|name| !self.probes.iter().any(|p| p.name() == *name))
            .collect()
    }

    /// Probes the config would run if it opted into gesture-gated probes.
    pub fn gated_out(&self, config: &RunnerConfig) -> Vec<&'static str> {
        if config.gesture_gated {
            return Vec::new();
        }
        self.probes
            .iter()
            .filter(|p| p.requires_gesture())
            .map(|p| p.name())
            .filter(|name| config.only.is_empty() || config.only.iter().any(|n| n == name))
            .collect()
    }

    /// Run every probe the config selects and build the report.
    pub async fn run_all(&self, config: &RunnerConfig) -> AggregateReport {
        for name in self.unknown_names(config) {
            log::warn!("Probe {} not found; skipped", name);
        }
        for name in self.gated_out(config) {
            log::warn!("Probe {} needs a user gesture; skipped (set gesture_gated)", name);
        }

        let selected: Vec<&dyn Probe> = self
            .probes
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| config.selects(p.name(), p.requires_gesture()))
            .collect();

        log::info!("🔎 Running {} probes (timeout {}ms)", selected.len(), config.timeout_ms);
        let started = self.runtime.now_ms();

        let results = join_all(
            selected
                .iter()
                .map(|probe| self.invoke(*probe, config.timeout_ms)),
        )
        .await;

        let outputs: BTreeMap<String, ProbeResult> = selected
            .iter()
            .map(|p| p.name().to_string())
            .zip(results)
            .collect();

        let report = AggregateReport::new(self.runtime.now_ms(), config.timeout_ms, outputs);
        log::info!(
            "✅ Collection complete: {} probes, {} failed, {}ms",
            report.meta.probe_count,
            report.meta.failed_count,
            report.meta.time.saturating_sub(started)
        );
        report
    }

    /// Run a single probe by name. Unknown names become a failure, never
    /// an error.
    pub async fn run_one(&self, name: &str, config: &RunnerConfig) -> ProbeResult {
        match self.probes.iter().find(|p| p.name() == name) {
            Some(probe) => self.invoke(probe.as_ref(), config.timeout_ms).await,
            None => {
                log::warn!("Probe {} not found", name);
                Guarded::Failed(ProbeFailure::from(&ProbeError::UnknownProbe(
                    name.to_string(),
                )))
            }
        }
    }

    async fn invoke(&self, probe: &dyn Probe, timeout_ms: u32) -> ProbeResult {
        let vector = probe.vector();
        let result = safe_call(move || async move {
            let timestamp = self.runtime.now_ms();
            let data = self.bounded(probe, timeout_ms).await?;
            Ok(ProbeEnvelope {
                vector: vector.to_string(),
                timestamp,
                data,
            })
        })
        .await;

        match &result {
            Guarded::Value(_) => log::debug!("  ✓ {} collected", probe.name()),
            Guarded::Failed(f) => log::warn!("  ⚠️ {} failed: {}", probe.name(), f.error),
        }
        result
    }

    /// Race the probe against the runtime's timer.
    async fn bounded(&self, probe: &dyn Probe, timeout_ms: u32) -> Result<ProbeData> {
        let collect = probe.collect().fuse();
        let timer = self.runtime.sleep(timeout_ms).fuse();
        futures::pin_mut!(collect, timer);

        futures::select_biased! {
            result = collect => result,
            _ = timer => Err(ProbeError::Timeout {
                vector: probe.vector().to_string(),
                timeout_ms,
            }),
        }
    }
}
