//! [`PhaseRegistry`]: the per-phase dependency graphs of one scheduler.
//!
//! The registry is populated during configuration, then finalized once:
//! every graph is sorted and frozen. A failed finalize leaves every graph
//! unfrozen so the caller can inspect what went wrong.

use cadence_core::{ActionId, AttributeFlag, AttributeSet, GraphError, PhaseId};
use indexmap::IndexMap;

use crate::action::Action;
use crate::dump::GraphDump;
use crate::graph::DependencyGraph;
use crate::schedule::PhaseSchedule;

/// Phase id to [`DependencyGraph`], plus the run schedule.
#[derive(Debug)]
pub struct PhaseRegistry {
    schedule: PhaseSchedule,
    graphs: IndexMap<PhaseId, DependencyGraph>,
    finalized: bool,
}

impl PhaseRegistry {
    /// Create a registry with an empty graph for every scheduled phase.
    pub fn new(schedule: PhaseSchedule) -> Self {
        let graphs = schedule
            .all()
            .map(|phase| (phase.clone(), DependencyGraph::new(phase)))
            .collect();
        Self {
            schedule,
            graphs,
            finalized: false,
        }
    }

    /// The run schedule.
    pub fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    /// Phases executed on every step, in order.
    pub fn phase_order(&self) -> &[PhaseId] {
        &self.schedule.cycle
    }

    /// The graph for `phase`, created empty on first reference.
    ///
    /// # Errors
    ///
    /// [`GraphError::RegistryFrozen`] after [`finalize`](Self::finalize),
    /// whether or not the phase exists. Use [`graph`](Self::graph) to
    /// inspect a finalized phase.
    pub fn phase(
        &mut self,
        phase: impl Into<PhaseId>,
    ) -> Result<&mut DependencyGraph, GraphError> {
        let phase = phase.into();
        if self.finalized {
            return Err(GraphError::RegistryFrozen { phase });
        }
        Ok(self
            .graphs
            .entry(phase)
            .or_insert_with_key(|phase| DependencyGraph::new(phase)))
    }

    /// The graph for `phase`, if it exists.
    pub fn graph(&self, phase: impl AsRef<str>) -> Result<&DependencyGraph, GraphError> {
        let phase = phase.as_ref();
        self.graphs.get(phase).ok_or_else(|| GraphError::UnknownPhase {
            phase: PhaseId::new(phase),
        })
    }

    /// Register `action` under `phase`, creating the phase if needed.
    ///
    /// # Errors
    ///
    /// [`GraphError::RegistryFrozen`] after finalize,
    /// [`GraphError::DuplicateNode`] if the id is taken in that phase.
    pub fn register_action(
        &mut self,
        phase: impl Into<PhaseId>,
        id: impl Into<ActionId>,
        name: impl Into<String>,
        action: impl Action,
        attributes: AttributeSet,
    ) -> Result<(), GraphError> {
        self.phase(phase)?.add_node(id, name, action, attributes)
    }

    /// Declare that `dependent` runs after `dependency` within `phase`.
    ///
    /// # Errors
    ///
    /// As [`DependencyGraph::add_edge`]. A phase that does not exist has
    /// no actions, so it yields [`GraphError::UnknownNode`].
    pub fn add_dependency(
        &mut self,
        phase: impl AsRef<str>,
        dependent: impl AsRef<str>,
        dependency: impl AsRef<str>,
    ) -> Result<(), GraphError> {
        let phase = phase.as_ref();
        match self.graphs.get_mut(phase) {
            Some(graph) => graph.add_edge(dependent, dependency),
            None if self.finalized => Err(GraphError::RegistryFrozen {
                phase: PhaseId::new(phase),
            }),
            None => Err(GraphError::UnknownNode {
                phase: PhaseId::new(phase),
                action: ActionId::new(dependent),
            }),
        }
    }

    /// Whether `action` in `phase` was registered with `flag`.
    pub fn query_attribute<F: AttributeFlag>(
        &self,
        phase: impl AsRef<str>,
        action: impl AsRef<str>,
        flag: F,
    ) -> Result<bool, GraphError> {
        self.graph(phase)?.query_attribute(action, flag)
    }

    /// Sort every phase and freeze the registry.
    ///
    /// Scheduled phases are sorted in schedule order, then any other
    /// phases in ascending id order. The first failure is returned and
    /// nothing is frozen.
    pub fn finalize(&mut self) -> Result<(), GraphError> {
        if self.finalized {
            return Ok(());
        }
        let mut extra: Vec<PhaseId> = self
            .graphs
            .keys()
            .filter(|phase| !self.schedule.contains(phase))
            .cloned()
            .collect();
        extra.sort();
        let order: Vec<PhaseId> = self.schedule.all().cloned().chain(extra).collect();

        for phase in &order {
            if let Some(graph) = self.graphs.get_mut(phase) {
                graph.sort()?;
            }
        }
        for graph in self.graphs.values_mut() {
            graph.freeze();
        }
        self.finalized = true;
        tracing::info!(
            phases = self.graphs.len(),
            actions = self.action_count(),
            "registry finalized"
        );
        Ok(())
    }

    /// Whether [`finalize`](Self::finalize) has succeeded.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The sorted actions of `phase`.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownPhase`] for a missing phase,
    /// [`GraphError::NotSorted`] before finalize.
    pub fn sorted(&self, phase: impl AsRef<str>) -> Result<&[ActionId], GraphError> {
        let graph = self.graph(phase)?;
        graph.sorted().ok_or_else(|| GraphError::NotSorted {
            phase: graph.phase().clone(),
        })
    }

    /// Every phase id, ascending.
    pub fn phases(&self) -> Vec<&PhaseId> {
        let mut phases: Vec<&PhaseId> = self.graphs.keys().collect();
        phases.sort();
        phases
    }

    /// Total number of actions across all phases.
    pub fn action_count(&self) -> usize {
        self.graphs.values().map(DependencyGraph::len).sum()
    }

    /// Snapshot of one phase's graph.
    pub fn dump_graph(&self, phase: impl AsRef<str>) -> Result<GraphDump, GraphError> {
        Ok(self.graph(phase)?.dump())
    }
}
