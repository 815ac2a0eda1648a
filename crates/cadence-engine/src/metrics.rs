//! Per-step timing and whole-run summaries.
//!
//! [`StepMetrics`] captures timing for a single step; [`RunSummary`] is
//! what [`Scheduler::execute`](crate::Scheduler::execute) reports at the end.

use cadence_core::{ActionFailure, ActionId, PhaseId, StepId};

/// Timing collected during a single step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Step counter value when the step started.
    pub step: StepId,
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Per-phase execution times, in execution order.
    pub phase_us: Vec<(PhaseId, u64)>,
    /// Per-action execution times, in execution order.
    pub action_us: Vec<(ActionId, u64)>,
    /// Number of actions that failed during the step.
    pub failed_actions: usize,
}

/// Outcome of a complete run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps completed.
    pub steps: u64,
    /// Action invocations, including failed ones.
    pub actions_executed: u64,
    /// Every recorded failure, in order.
    pub failures: Vec<ActionFailure>,
}

impl RunSummary {
    /// Whether no action failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit code: `0`, or the first failure's code.
    pub fn exit_code(&self) -> i32 {
        self.failures.first().map_or(0, ActionFailure::exit_code)
    }
}
