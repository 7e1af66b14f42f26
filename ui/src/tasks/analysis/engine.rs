//! State machine for the capture-and-analyse workflow.
//!
//! The engine owns no timers. The hosting view drives it with events, and
//! every event carries the `run_id` it was scheduled under, so a timer or
//! poll result that fires after a reset lands on a stale id and is dropped
//! instead of applied.

use tracing::debug;

use super::simulate::AnalysisResult;

/// Workflow phases. Transitions run forward only; `reset` is the sole way
/// back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Countdown,
    Analyzing,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub countdown_seconds: u32,
    pub analysis_delay_ms: u64,
    pub poll_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 20,
            analysis_delay_ms: 3_000,
            poll_timeout_ms: 60_000,
            poll_interval_ms: 3_000,
        }
    }
}

/// What the view should do after feeding a countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown still running; schedule the next tick.
    Continue,
    /// Countdown hit zero; schedule the analysis delay. The poller keeps
    /// running toward its own timeout.
    AnalysisScheduled,
    /// Stale or out-of-phase tick; drop it.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    pub run_id: u64,
    pub phase: Phase,
    pub countdown_remaining: u32,
    pub config: EngineConfig,
    pub result: Option<AnalysisResult>,
    pub sample_image: Option<String>,
    pub last_error: Option<String>,
}

impl AnalysisEngine {
    /// Begin a run. Refused outside `Idle`. Returns the new run id so the
    /// view can stamp the timers and tasks it spawns.
    pub fn start(&mut self) -> Option<u64> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.run_id += 1;
        self.phase = Phase::Countdown;
        self.countdown_remaining = self.config.countdown_seconds;
        self.result = None;
        self.sample_image = None;
        self.last_error = None;
        debug!(run_id = self.run_id, "workflow started");
        Some(self.run_id)
    }

    pub fn tick(&mut self, run_id: u64) -> TickOutcome {
        if run_id != self.run_id || self.phase != Phase::Countdown {
            return TickOutcome::Ignored;
        }
        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining == 0 {
            self.phase = Phase::Analyzing;
            debug!(run_id, "countdown elapsed, analysis pending");
            TickOutcome::AnalysisScheduled
        } else {
            TickOutcome::Continue
        }
    }

    /// Store the simulated record. Only the live run, and only while
    /// `Analyzing`, may complete. The record is immutable afterwards.
    pub fn finish_analysis(&mut self, run_id: u64, result: AnalysisResult) -> bool {
        if run_id != self.run_id || self.phase != Phase::Analyzing {
            return false;
        }
        self.result = Some(result);
        self.phase = Phase::Results;
        debug!(run_id, "analysis complete");
        true
    }

    /// Record the captured sample locator for preview and report embedding.
    pub fn set_sample_image(&mut self, run_id: u64, locator: String) -> bool {
        if run_id != self.run_id {
            return false;
        }
        self.sample_image = Some(locator);
        true
    }

    /// Latest-wins error surface. Capture or poll failures never change
    /// phase: the workflow runs on regardless.
    pub fn record_error(&mut self, run_id: u64, message: String) {
        if run_id != self.run_id {
            return;
        }
        self.last_error = Some(message);
    }

    /// Abandon the current run from any phase. Bumping `run_id` orphans
    /// every timer and poll scheduled under the old id.
    pub fn reset(&mut self) {
        self.run_id += 1;
        self.phase = Phase::Idle;
        self.countdown_remaining = 0;
        self.result = None;
        self.sample_image = None;
        self.last_error = None;
        debug!(run_id = self.run_id, "workflow reset");
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Countdown | Phase::Analyzing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::analysis::simulate;

    #[test]
    fn start_is_refused_outside_idle() {
        let mut engine = AnalysisEngine::default();
        let first = engine.start().expect("idle engine starts");
        assert!(engine.start().is_none());
        assert_eq!(engine.phase, Phase::Countdown);
        assert_eq!(engine.run_id, first);
    }

    #[test]
    fn twenty_ticks_reach_analyzing_despite_capture_failure() {
        let mut engine = AnalysisEngine::default();
        let run = engine.start().unwrap();

        engine.record_error(run, "network error: connection refused".into());
        assert_eq!(engine.phase, Phase::Countdown);

        for _ in 0..19 {
            assert_eq!(engine.tick(run), TickOutcome::Continue);
        }
        assert_eq!(engine.tick(run), TickOutcome::AnalysisScheduled);
        assert_eq!(engine.phase, Phase::Analyzing);
        assert!(engine.last_error.is_some());
    }

    #[test]
    fn stale_events_are_ignored_after_reset() {
        let mut engine = AnalysisEngine::default();
        let old_run = engine.start().unwrap();
        engine.reset();

        assert_eq!(engine.tick(old_run), TickOutcome::Ignored);
        assert!(!engine.set_sample_image(old_run, "sample.jpg".into()));
        assert!(!engine.finish_analysis(old_run, simulate(7)));
        engine.record_error(old_run, "late failure".into());

        assert_eq!(engine.phase, Phase::Idle);
        assert!(engine.sample_image.is_none());
        assert!(engine.result.is_none());
        assert!(engine.last_error.is_none());
    }

    #[test]
    fn finish_requires_the_analyzing_phase() {
        let mut engine = AnalysisEngine::default();
        let run = engine.start().unwrap();

        assert!(!engine.finish_analysis(run, simulate(7)));

        for _ in 0..20 {
            engine.tick(run);
        }
        assert!(engine.finish_analysis(run, simulate(7)));
        assert_eq!(engine.phase, Phase::Results);

        // A second completion cannot overwrite the stored record.
        assert!(!engine.finish_analysis(run, simulate(8)));
    }

    #[test]
    fn reset_clears_run_state_and_bumps_the_run() {
        let mut engine = AnalysisEngine::default();
        let run = engine.start().unwrap();
        engine.set_sample_image(run, "sample.jpg".into());
        for _ in 0..20 {
            engine.tick(run);
        }
        engine.finish_analysis(run, simulate(7));

        engine.reset();
        assert_eq!(engine.phase, Phase::Idle);
        assert!(engine.result.is_none());
        assert!(engine.sample_image.is_none());
        assert!(engine.run_id > run);

        // The next run starts cleanly from the bumped id.
        let next = engine.start().unwrap();
        assert!(next > run);
        assert_eq!(engine.countdown_remaining, engine.config.countdown_seconds);
    }
}
