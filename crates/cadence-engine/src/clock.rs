//! The simulation step counter.

use cadence_core::StepId;

/// A monotonically increasing step counter with a configured limit.
///
/// Owned by the scheduler; the counter is never rewound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationClock {
    step: StepId,
    limit: u64,
}

impl SimulationClock {
    /// A clock at step 0 with the given limit.
    pub fn new(limit: u64) -> Self {
        Self {
            step: StepId::default(),
            limit,
        }
    }

    /// Current step.
    pub fn step(&self) -> StepId {
        self.step
    }

    /// Configured limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Increment the counter and return the new value.
    pub fn advance(&mut self) -> StepId {
        self.step = self.step.next();
        self.step
    }

    /// Whether the current step is strictly below `limit`.
    pub fn run(&self, limit: u64) -> bool {
        self.step.0 < limit
    }

    /// [`run`](Self::run) against the configured limit.
    pub fn is_running(&self) -> bool {
        self.run(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_is_false_after_limit_advances() {
        let mut clock = SimulationClock::new(3);
        assert!(clock.run(3));
        assert_eq!(clock.advance(), StepId(1));
        assert_eq!(clock.advance(), StepId(2));
        assert!(clock.run(3));
        assert_eq!(clock.advance(), StepId(3));
        assert!(!clock.run(3));
        assert!(!clock.is_running());
    }

    #[test]
    fn zero_limit_never_runs() {
        let clock = SimulationClock::new(0);
        assert!(!clock.is_running());
        assert_eq!(clock.step(), StepId(0));
        assert_eq!(clock.limit(), 0);
    }
}
