//! Scheduler configuration, validation, and error types.
//!
//! [`SchedulerConfig`] is the input for constructing a [`Scheduler`](crate::Scheduler).
//! [`validate()`](SchedulerConfig::validate) checks structural invariants
//! before any registry is built.

use cadence_core::PhaseId;
use cadence_graph::PhaseSchedule;
use thiserror::Error;

// ── FailurePolicy ──────────────────────────────────────────────────

/// What the scheduler does after an action fails.
///
/// In both cases the remaining actions of the failing phase are skipped
/// and the failure hook sees the failure first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run: skip the rest of the step, leave the clock where it
    /// is, and move the scheduler to `Completed` without teardown.
    #[default]
    AbortRun,
    /// Skip the rest of the phase, record the failure, and carry on with
    /// the next phase.
    AbortPhase,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SchedulerConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The per-step cycle has no phases.
    #[error("phase cycle is empty")]
    EmptyCycle,
    /// A phase is listed more than once across setup, cycle, and teardown.
    #[error("phase '{phase}' is scheduled more than once")]
    DuplicatePhase {
        /// The repeated phase.
        phase: PhaseId,
    },
}

// ── SchedulerConfig ────────────────────────────────────────────────

/// Complete configuration for constructing a scheduler.
#[derive(Clone, Debug, Default)]
pub struct SchedulerConfig {
    /// Setup, per-step, and teardown phases.
    pub schedule: PhaseSchedule,
    /// Steps [`Scheduler::execute`](crate::Scheduler::execute) runs.
    /// Default: 0.
    pub step_limit: u64,
    /// Reaction to a failing action. Default: [`FailurePolicy::AbortRun`].
    pub failure_policy: FailurePolicy,
    /// Argument vector handed to every action.
    pub args: Vec<String>,
}

impl SchedulerConfig {
    /// A configuration with the given per-step cycle and defaults elsewhere.
    pub fn new<P: Into<PhaseId>>(cycle: impl IntoIterator<Item = P>) -> Self {
        Self {
            schedule: PhaseSchedule::new(cycle),
            ..Self::default()
        }
    }

    /// Phases run once before the first step.
    pub fn with_setup<P: Into<PhaseId>>(mut self, setup: impl IntoIterator<Item = P>) -> Self {
        self.schedule = self.schedule.with_setup(setup);
        self
    }

    /// Phases run once after the last step.
    pub fn with_teardown<P: Into<PhaseId>>(
        mut self,
        teardown: impl IntoIterator<Item = P>,
    ) -> Self {
        self.schedule = self.schedule.with_teardown(teardown);
        self
    }

    /// Number of steps to run.
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Reaction to failing actions.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Argument vector handed to every action.
    pub fn with_args<S: Into<String>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.cycle.is_empty() {
            return Err(ConfigError::EmptyCycle);
        }
        if let Some(phase) = self.schedule.first_duplicate() {
            return Err(ConfigError::DuplicatePhase {
                phase: phase.clone(),
            });
        }
        Ok(())
    }
}
