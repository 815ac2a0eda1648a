//! [`DependencyGraph`]: one phase's actions and their ordering constraints.
//!
//! Nodes are keyed by [`ActionId`]; an edge `(dependent, dependency)`
//! requires `dependency` to run before `dependent`. [`DependencyGraph::sort`]
//! computes a topological order with Kahn's algorithm, breaking ties by
//! ascending action id so the order is identical on every run.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use std::fmt;

use cadence_core::{ActionId, AttributeFlag, AttributeSet, GraphError, PhaseId};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::action::Action;
use crate::dump::{GraphDump, NodeSummary};
use crate::node::ActionNode;

/// The dependency graph of a single phase.
pub struct DependencyGraph {
    phase: PhaseId,
    nodes: BTreeMap<ActionId, ActionNode>,
    /// `(dependent, dependency)` pairs.
    edges: BTreeSet<(ActionId, ActionId)>,
    sorted: Option<Vec<ActionId>>,
    frozen: bool,
}

impl DependencyGraph {
    /// Create an empty graph owned by `phase`.
    pub fn new(phase: impl Into<PhaseId>) -> Self {
        Self {
            phase: phase.into(),
            nodes: BTreeMap::new(),
            edges: BTreeSet::new(),
            sorted: None,
            frozen: false,
        }
    }

    /// The phase this graph belongs to.
    pub fn phase(&self) -> &PhaseId {
        &self.phase
    }

    // ── Construction ────────────────────────────────────────────

    /// Register an action.
    ///
    /// # Errors
    ///
    /// [`GraphError::RegistryFrozen`] once the graph is frozen,
    /// [`GraphError::DuplicateNode`] if `id` is already present. The
    /// graph is unchanged on error.
    pub fn add_node(
        &mut self,
        id: impl Into<ActionId>,
        name: impl Into<String>,
        action: impl Action,
        attributes: AttributeSet,
    ) -> Result<(), GraphError> {
        self.insert(ActionNode::new(id, name, action, attributes))
    }

    /// Register a pre-built node. Same rules as [`add_node`](Self::add_node).
    pub fn insert(&mut self, node: ActionNode) -> Result<(), GraphError> {
        self.ensure_mutable()?;
        if self.nodes.contains_key(node.id()) {
            return Err(GraphError::DuplicateNode {
                phase: self.phase.clone(),
                action: node.id().clone(),
            });
        }
        tracing::debug!(
            phase = %self.phase,
            action = %node.id(),
            attributes = node.attributes().bits(),
            "registered action"
        );
        self.nodes.insert(node.id().clone(), node);
        self.sorted = None;
        Ok(())
    }

    /// Declare that `dependent` must run after `dependency`.
    ///
    /// Re-adding an existing edge is a no-op.
    ///
    /// # Errors
    ///
    /// [`GraphError::RegistryFrozen`] once the graph is frozen,
    /// [`GraphError::UnknownNode`] if either endpoint is missing,
    /// [`GraphError::InvalidEdge`] if both endpoints are the same action.
    pub fn add_edge(
        &mut self,
        dependent: impl AsRef<str>,
        dependency: impl AsRef<str>,
    ) -> Result<(), GraphError> {
        self.ensure_mutable()?;
        let dependent = self.known_id(dependent.as_ref())?;
        let dependency = self.known_id(dependency.as_ref())?;
        if dependent == dependency {
            return Err(GraphError::InvalidEdge {
                phase: self.phase.clone(),
                action: dependent,
            });
        }
        tracing::debug!(
            phase = %self.phase,
            %dependent,
            %dependency,
            "added dependency"
        );
        if self.edges.insert((dependent, dependency)) {
            self.sorted = None;
        }
        Ok(())
    }

    /// Prevent any further nodes or edges from being added.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether [`freeze`](Self::freeze) has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn ensure_mutable(&self) -> Result<(), GraphError> {
        if self.frozen {
            return Err(GraphError::RegistryFrozen {
                phase: self.phase.clone(),
            });
        }
        Ok(())
    }

    fn known_id(&self, id: &str) -> Result<ActionId, GraphError> {
        match self.nodes.get_key_value(id) {
            Some((key, _)) => Ok(key.clone()),
            None => Err(self.unknown(id)),
        }
    }

    fn unknown(&self, id: &str) -> GraphError {
        GraphError::UnknownNode {
            phase: self.phase.clone(),
            action: ActionId::new(id),
        }
    }

    // ── Ordering ────────────────────────────────────────────────

    /// Compute (or return the cached) topological order.
    ///
    /// Every action appears exactly once and after all of its
    /// dependencies. Among actions ready at the same time the smallest
    /// id goes first.
    ///
    /// # Errors
    ///
    /// [`GraphError::CycleDetected`] naming, in ascending order, every
    /// action that could not be ordered. Nothing is cached on error.
    pub fn sort(&mut self) -> Result<&[ActionId], GraphError> {
        if self.sorted.is_none() {
            let order = self.topological_order()?;
            tracing::trace!(
                phase = %self.phase,
                order = ?order.iter().map(ActionId::as_str).collect::<Vec<_>>(),
                "sorted phase"
            );
            self.sorted = Some(order);
        }
        Ok(self.sorted.as_deref().unwrap_or_default())
    }

    /// The cached order, if [`sort`](Self::sort) has succeeded since the
    /// last modification.
    pub fn sorted(&self) -> Option<&[ActionId]> {
        self.sorted.as_deref()
    }

    fn topological_order(&self) -> Result<Vec<ActionId>, GraphError> {
        let mut in_degree: IndexMap<&ActionId, usize> =
            self.nodes.keys().map(|id| (id, 0)).collect();
        let mut dependents: IndexMap<&ActionId, SmallVec<[&ActionId; 4]>> = IndexMap::new();

        for (dependent, dependency) in &self.edges {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree += 1;
            }
            dependents.entry(dependency).or_default().push(dependent);
        }

        let mut ready: BinaryHeap<Reverse<&ActionId>> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&id, _)| Reverse(id))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id.clone());
            let Some(next) = dependents.get(id) else {
                continue;
            };
            for &dependent in next {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(dependent));
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            // in_degree was seeded from the BTreeMap, so this is ascending.
            let unresolved = in_degree
                .iter()
                .filter(|&(_, &degree)| degree > 0)
                .map(|(&id, _)| id.clone())
                .collect();
            return Err(GraphError::CycleDetected {
                phase: self.phase.clone(),
                unresolved,
            });
        }
        Ok(order)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Look up a node by id.
    pub fn node(&self, id: impl AsRef<str>) -> Result<&ActionNode, GraphError> {
        let id = id.as_ref();
        self.nodes.get(id).ok_or_else(|| self.unknown(id))
    }

    /// Whether `id` was registered with `flag`.
    pub fn query_attribute<F: AttributeFlag>(
        &self,
        id: impl AsRef<str>,
        flag: F,
    ) -> Result<bool, GraphError> {
        Ok(self.node(id)?.has_attribute(flag))
    }

    /// Whether an action with this id is registered.
    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.nodes.contains_key(id.as_ref())
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct dependency edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Registered nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &ActionNode> + '_ {
        self.nodes.values()
    }

    /// Edges as `(dependent, dependency)`, ascending.
    pub fn edges(&self) -> impl Iterator<Item = (&ActionId, &ActionId)> + '_ {
        self.edges.iter().map(|(a, b)| (a, b))
    }

    /// Direct dependencies of `id`, ascending.
    pub fn dependencies_of(&self, id: impl AsRef<str>) -> Result<Vec<&ActionId>, GraphError> {
        let id = self.node(id)?.id();
        Ok(self
            .edges
            .iter()
            .filter(|(dependent, _)| dependent == id)
            .map(|(_, dependency)| dependency)
            .collect())
    }

    /// Actions that directly depend on `id`, ascending.
    pub fn dependents_of(&self, id: impl AsRef<str>) -> Result<Vec<&ActionId>, GraphError> {
        let id = self.node(id)?.id();
        Ok(self
            .edges
            .iter()
            .filter(|(_, dependency)| dependency == id)
            .map(|(dependent, _)| dependent)
            .collect())
    }

    /// Snapshot of the graph for diagnostics.
    pub fn dump(&self) -> GraphDump {
        GraphDump {
            phase: self.phase.clone(),
            nodes: self
                .nodes
                .values()
                .map(|n| NodeSummary {
                    id: n.id().clone(),
                    name: n.name().to_string(),
                    attributes: n.attributes(),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|(dependent, dependency)| (dependent.clone(), dependency.clone()))
                .collect(),
        }
    }
}

impl fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("phase", &self.phase)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("sorted", &self.sorted.is_some())
            .field("frozen", &self.frozen)
            .finish()
    }
}
