//! The generate → store → publish loop.
//!
//! Strictly single-threaded: each iteration runs one full cycle, then
//! sleeps. The shutdown flag is checked at iteration boundaries only, so
//! an in-flight git command is never interrupted.

use crate::config::UploaderConfig;
use crate::publisher::Publisher;
use chrono::Utc;
use rand::Rng;
use simquake_core::store::{self, LoadOutcome};
use simquake_core::{significance, ScenarioCycle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Scheduler lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// How long to sleep between cycles.
#[derive(Debug, Clone, Copy)]
pub enum SleepPolicy {
    /// Always the full interval.
    Fixed(Duration),

    /// Interval minus the cycle's elapsed wall-clock time, floored at zero.
    DriftCorrected(Duration),

    /// Uniform random duration in `[min, max]`.
    RandomRange { min: Duration, max: Duration },
}

/// Computes the sleep for one iteration.
pub fn compute_sleep<R: Rng>(policy: SleepPolicy, elapsed: Duration, rng: &mut R) -> Duration {
    match policy {
        SleepPolicy::Fixed(interval) => interval,
        SleepPolicy::DriftCorrected(interval) => interval.saturating_sub(elapsed),
        SleepPolicy::RandomRange { min, max } => {
            if max <= min {
                return min;
            }
            let span = (max - min).as_secs_f64();
            min + Duration::from_secs_f64(rng.gen::<f64>() * span)
        }
    }
}

/// Drives generate → store → publish cycles until stopped.
pub struct Scheduler<R: Rng> {
    config: UploaderConfig,
    publisher: Publisher,
    cycle: ScenarioCycle,
    rng: R,
    shutdown: Arc<AtomicBool>,
    state: SchedulerState,
}

impl<R: Rng> Scheduler<R> {
    pub fn new(
        config: UploaderConfig,
        publisher: Publisher,
        rng: R,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let cycle = ScenarioCycle::new(config.tsunami_ratio);
        Self {
            config,
            publisher,
            cycle,
            rng,
            shutdown,
            state: SchedulerState::Stopped,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Runs until the shutdown flag is set, or after one cycle in
    /// single-shot mode. Returns the number of completed cycles.
    pub fn run(&mut self) -> u64 {
        self.state = SchedulerState::Running;
        let mut iterations = 0;

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            let started = Instant::now();

            self.run_cycle();
            iterations += 1;

            if self.config.once || self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            let sleep = compute_sleep(self.config.sleep, started.elapsed(), &mut self.rng);
            info!("⏳ next cycle in {:.1}s", sleep.as_secs_f64());
            thread::sleep(sleep);
        }

        self.state = SchedulerState::Stopped;
        info!("scheduler stopped after {} cycle(s)", iterations);
        iterations
    }

    /// One generate → store → publish pass. Everything past event
    /// generation is best-effort: failures are logged and the loop moves
    /// on to the next cycle.
    fn run_cycle(&mut self) {
        let scenario = match self.config.scenario {
            Some(id) => id,
            None => self.cycle.next(&mut self.rng),
        };

        let candidate = significance::sample_matched(
            &mut self.rng,
            scenario,
            self.config.target,
            self.config.max_tries,
        );
        let event = candidate.into_event(&mut self.rng, Utc::now());

        let outcome = store::load(&self.config.output_path);
        match &outcome {
            LoadOutcome::Unreadable(e) => warn!("feed file unreadable, starting fresh: {e}"),
            LoadOutcome::Malformed(e) => warn!("feed file is not valid JSON, starting fresh: {e}"),
            LoadOutcome::NotAnArray => warn!("feed file is not a JSON array, starting fresh"),
            LoadOutcome::Loaded(_) | LoadOutcome::Absent => {}
        }
        let mut events = outcome.into_events();

        if let Err(e) = store::append_and_trim(&mut events, &event, self.config.keep) {
            warn!("failed to encode event, skipping cycle: {e}");
            return;
        }
        if let Err(e) = store::save(&self.config.output_path, &events) {
            warn!("failed to write {}: {e}", self.config.output_path.display());
            return;
        }

        let message = format!("simulate: add {} at {}", event.id, event.time.to_rfc3339());
        match self.publisher.publish(&self.config.output_path, &message) {
            Ok(()) => info!(
                "✅ pushed {} | M{:.1} | {} | {}",
                event.id,
                event.magnitude,
                event.place,
                event.time.format("%Y-%m-%d %H:%M:%SZ"),
            ),
            Err(e) => warn!("❌ push failed, will retry next cycle: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::PushMode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::Value;
    use std::path::Path;

    fn test_setup(dir: &Path, once: bool) -> (UploaderConfig, Publisher) {
        let config = UploaderConfig {
            output_path: dir.join("dist").join("quake.json"),
            once,
            ..UploaderConfig::default()
        };
        // The tempdir is not a git repo, so publishing fails and is
        // swallowed, which is exactly the lenient policy under test.
        let publisher = Publisher::new(
            dir,
            PushMode::Ambient {
                remote: "origin".to_string(),
                branch: "main".to_string(),
            },
        );
        (config, publisher)
    }

    #[test]
    fn test_compute_sleep_fixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let policy = SleepPolicy::Fixed(Duration::from_secs(60));

        assert_eq!(
            compute_sleep(policy, Duration::from_secs(10), &mut rng),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_compute_sleep_drift_corrected() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let policy = SleepPolicy::DriftCorrected(Duration::from_secs(60));

        assert_eq!(
            compute_sleep(policy, Duration::from_secs(12), &mut rng),
            Duration::from_secs(48)
        );
        // A slow cycle never produces a negative sleep
        assert_eq!(
            compute_sleep(policy, Duration::from_secs(75), &mut rng),
            Duration::ZERO
        );
        assert_eq!(
            compute_sleep(policy, Duration::from_secs(60), &mut rng),
            Duration::ZERO
        );
    }

    #[test]
    fn test_compute_sleep_random_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let min = Duration::from_secs(30);
        let max = Duration::from_secs(90);
        let policy = SleepPolicy::RandomRange { min, max };

        for _ in 0..1000 {
            let sleep = compute_sleep(policy, Duration::ZERO, &mut rng);
            assert!(sleep >= min && sleep <= max);
        }

        // Degenerate range collapses to min
        let collapsed = SleepPolicy::RandomRange { min: max, max: min };
        assert_eq!(compute_sleep(collapsed, Duration::ZERO, &mut rng), max);
    }

    #[test]
    fn test_single_shot_runs_one_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let (config, publisher) = test_setup(dir.path(), true);
        let output_path = config.output_path.clone();

        let rng = ChaCha8Rng::seed_from_u64(42);
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut scheduler = Scheduler::new(config, publisher, rng, shutdown);

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        let cycles = scheduler.run();

        assert_eq!(cycles, 1);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        let raw = std::fs::read_to_string(&output_path).unwrap();
        let events: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0]["id"].as_str().unwrap().starts_with("sim-"));
    }

    #[test]
    fn test_preset_shutdown_flag_stops_before_first_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let (config, publisher) = test_setup(dir.path(), false);
        let output_path = config.output_path.clone();

        let rng = ChaCha8Rng::seed_from_u64(42);
        let shutdown = Arc::new(AtomicBool::new(true));
        let mut scheduler = Scheduler::new(config, publisher, rng, shutdown);

        assert_eq!(scheduler.run(), 0);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(!output_path.exists());
    }

    #[test]
    fn test_cycles_accumulate_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let (config, publisher) = test_setup(dir.path(), true);
        let output_path = config.output_path.clone();

        let shutdown = Arc::new(AtomicBool::new(false));
        let mut scheduler = Scheduler::new(
            config.clone(),
            publisher.clone(),
            ChaCha8Rng::seed_from_u64(1),
            shutdown.clone(),
        );
        scheduler.run();
        let first: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();

        let mut scheduler = Scheduler::new(config, publisher, ChaCha8Rng::seed_from_u64(2), shutdown);
        scheduler.run();
        let second: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();

        assert_eq!(second.len(), 2);
        // Previous newest slid to index 1
        assert_eq!(second[1], first[0]);
    }
}
