//! Per-step and per-run timing metrics.
//!
//! [`StepMetrics`] captures wall-clock timings for a single RK4 step;
//! [`RunMetrics`] accumulates named phase totals across a whole run in
//! insertion order.

use indexmap::IndexMap;
use smallvec::SmallVec;

/// Timing metrics collected during a single timestep.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time for the whole step.
    pub total_us: u64,
    /// Time spent in RHS evaluation, summed over the four stages.
    pub rhs_us: u64,
    /// Time spent in the pointwise running-total / `y_tmp` updates.
    pub update_us: u64,
    /// Time spent applying the boundary condition.
    pub boundary_us: u64,
    /// Wall-clock time of each completed stage, in order.
    pub stage_us: SmallVec<[u64; 4]>,
    /// Bytes held by the four RK buffers.
    pub memory_bytes: usize,
}

/// Named phase totals for a whole run.
///
/// Phases keep the order in which they were first recorded, so a report
/// lists setup before the timestep loop.
#[derive(Clone, Debug, Default)]
pub struct RunMetrics {
    phases: IndexMap<&'static str, u64>,
    steps: u64,
}

impl RunMetrics {
    /// Phase name for RHS evaluation.
    pub const RHS: &'static str = "rhs";
    /// Phase name for pointwise updates.
    pub const UPDATE: &'static str = "update";
    /// Phase name for boundary application.
    pub const BOUNDARY: &'static str = "boundary";
    /// Phase name for whole steps.
    pub const STEP: &'static str = "step";

    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `us` microseconds to `phase`.
    pub fn record(&mut self, phase: &'static str, us: u64) {
        *self.phases.entry(phase).or_insert(0) += us;
    }

    /// Fold one step's timings into the totals.
    pub fn accumulate_step(&mut self, step: &StepMetrics) {
        self.record(Self::STEP, step.total_us);
        self.record(Self::RHS, step.rhs_us);
        self.record(Self::UPDATE, step.update_us);
        self.record(Self::BOUNDARY, step.boundary_us);
        self.steps += 1;
    }

    /// Total microseconds recorded for `phase`, if any.
    pub fn phase_us(&self, phase: &str) -> Option<u64> {
        self.phases.get(phase).copied()
    }

    /// Number of steps folded in.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Mean wall-clock time per step, or 0 with no steps.
    pub fn mean_step_us(&self) -> u64 {
        match self.steps {
            0 => 0,
            n => self.phase_us(Self::STEP).unwrap_or(0) / n,
        }
    }

    /// Phases and totals in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.phases.iter().map(|(&k, &v)| (k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.rhs_us, 0);
        assert_eq!(m.update_us, 0);
        assert_eq!(m.boundary_us, 0);
        assert!(m.stage_us.is_empty());
        assert_eq!(m.memory_bytes, 0);
    }

    #[test]
    fn run_metrics_accumulate_in_order() {
        let mut run = RunMetrics::new();
        run.record("setup", 7);
        let step = StepMetrics {
            total_us: 100,
            rhs_us: 60,
            update_us: 25,
            boundary_us: 10,
            stage_us: smallvec![30, 25, 25, 20],
            memory_bytes: 4096,
        };
        run.accumulate_step(&step);
        run.accumulate_step(&step);

        assert_eq!(run.steps(), 2);
        assert_eq!(run.phase_us(RunMetrics::RHS), Some(120));
        assert_eq!(run.phase_us("missing"), None);
        assert_eq!(run.mean_step_us(), 100);
        let names: Vec<_> = run.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["setup", "step", "rhs", "update", "boundary"]);
    }

    #[test]
    fn mean_of_empty_run_is_zero() {
        assert_eq!(RunMetrics::new().mean_step_us(), 0);
    }
}
