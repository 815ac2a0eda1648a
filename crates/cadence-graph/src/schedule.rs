//! [`PhaseSchedule`]: which phases run once and which run every step.

use cadence_core::PhaseId;

/// The ordered phases of a run.
///
/// `setup` phases execute once before the first step, `cycle` phases
/// execute in order on every step, and `teardown` phases execute once
/// after the last step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseSchedule {
    /// Phases run once before stepping begins.
    pub setup: Vec<PhaseId>,
    /// Phases run in order on every step.
    pub cycle: Vec<PhaseId>,
    /// Phases run once after stepping ends.
    pub teardown: Vec<PhaseId>,
}

impl PhaseSchedule {
    /// A schedule with the given per-step cycle and no setup or teardown.
    pub fn new<P: Into<PhaseId>>(cycle: impl IntoIterator<Item = P>) -> Self {
        Self {
            setup: Vec::new(),
            cycle: cycle.into_iter().map(Into::into).collect(),
            teardown: Vec::new(),
        }
    }

    /// Replace the setup phases.
    pub fn with_setup<P: Into<PhaseId>>(mut self, setup: impl IntoIterator<Item = P>) -> Self {
        self.setup = setup.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the teardown phases.
    pub fn with_teardown<P: Into<PhaseId>>(
        mut self,
        teardown: impl IntoIterator<Item = P>,
    ) -> Self {
        self.teardown = teardown.into_iter().map(Into::into).collect();
        self
    }

    /// Every scheduled phase: setup, then cycle, then teardown.
    pub fn all(&self) -> impl Iterator<Item = &PhaseId> + '_ {
        self.setup
            .iter()
            .chain(self.cycle.iter())
            .chain(self.teardown.iter())
    }

    /// Whether `phase` appears anywhere in the schedule.
    pub fn contains(&self, phase: impl AsRef<str>) -> bool {
        let phase = phase.as_ref();
        self.all().any(|p| p.as_str() == phase)
    }

    /// The first phase listed more than once, if any.
    pub fn first_duplicate(&self) -> Option<&PhaseId> {
        let mut seen = std::collections::HashSet::new();
        self.all().find(|p| !seen.insert(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_setup_cycle_teardown() {
        let s = PhaseSchedule::new(["advance", "analyze"])
            .with_setup(["initialize"])
            .with_teardown(["finalize"]);
        let all: Vec<&str> = s.all().map(PhaseId::as_str).collect();
        assert_eq!(all, ["initialize", "advance", "analyze", "finalize"]);
        assert!(s.contains("analyze"));
        assert!(!s.contains("mesh"));
        assert!(s.first_duplicate().is_none());
    }

    #[test]
    fn duplicate_across_sections_detected() {
        let s = PhaseSchedule::new(["advance", "io"]).with_teardown(["io"]);
        assert_eq!(s.first_duplicate().map(PhaseId::as_str), Some("io"));
    }
}
