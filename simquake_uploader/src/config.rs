//! Run configuration for the uploader loop.

use crate::publisher::PushMode;
use crate::scheduler::SleepPolicy;
use simquake_core::significance;
use simquake_core::ScenarioId;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one uploader run.
///
/// Defaults carry the values the first generation of this tool had
/// hardcoded: `dist/quake.json`, 60-second drift-corrected interval,
/// 120 retained events, push to `origin main`.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Feed file path
    pub output_path: PathBuf,

    /// Newest entries retained in the feed
    pub keep: usize,

    /// Acceptance threshold for the significance sampler
    pub target: f64,

    /// Retry budget before the sampler falls back
    pub max_tries: u32,

    /// Probability that a cycle forces the tsunami-prone scenario
    pub tsunami_ratio: f64,

    /// Explicit scenario override (None = round-robin)
    pub scenario: Option<ScenarioId>,

    /// Stop after a single cycle
    pub once: bool,

    /// Sleep policy between cycles
    pub sleep: SleepPolicy,

    /// How pushes authenticate
    pub push: PushMode,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("dist/quake.json"),
            keep: 120,
            target: significance::DEFAULT_TARGET,
            max_tries: significance::DEFAULT_MAX_TRIES,
            tsunami_ratio: 1.0 / 3.0,
            scenario: None,
            once: false,
            sleep: SleepPolicy::DriftCorrected(Duration::from_secs(60)),
            push: PushMode::Ambient {
                remote: "origin".to_string(),
                branch: "main".to_string(),
            },
        }
    }
}
