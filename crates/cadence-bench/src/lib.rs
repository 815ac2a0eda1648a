//! Benchmark profiles for the Cadence control model.
//!
//! - [`LayeredProfile`]: a seeded, layered DAG of no-op actions
//! - [`layered_config`]: a scheduler configuration with `phases` cycle
//!   phases, each meant to hold one layered graph

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cadence_core::{AttributeSet, GraphError};
use cadence_engine::SchedulerConfig;
use cadence_graph::{action_fn, DependencyGraph, PhaseRegistry};

/// A layered DAG: `layers` rows of `width` actions, each action outside
/// the first row depending on one to three actions of the row above.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayeredProfile {
    layers: usize,
    width: usize,
    /// `(dependent, dependency)` as flat node indices.
    edges: Vec<(usize, usize)>,
}

impl LayeredProfile {
    /// Build the edge set deterministically from `seed`.
    pub fn new(layers: usize, width: usize, seed: u64) -> Self {
        let mut edges = Vec::new();
        if width > 0 {
            for layer in 1..layers {
                for i in 0..width {
                    let node = layer * width + i;
                    let fan = 1 + (mix(seed, node as u64, 0) % 3) as usize;
                    for k in 0..fan.min(width) {
                        let j = (mix(seed, node as u64, k as u64 + 1) % width as u64) as usize;
                        edges.push((node, (layer - 1) * width + j));
                    }
                }
            }
        }
        Self {
            layers,
            width,
            edges,
        }
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.layers * self.width
    }

    /// Returns `true` if the profile has no actions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Edges as flat node indices, possibly with repeats.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Action id of flat node index `n`.
    pub fn action_id(&self, n: usize) -> String {
        format!("l{:03}_{:03}", n / self.width.max(1), n % self.width.max(1))
    }

    /// A standalone graph of no-op actions.
    pub fn build_graph(&self, phase: &str) -> Result<DependencyGraph, GraphError> {
        let mut graph = DependencyGraph::new(phase);
        for n in 0..self.len() {
            let id = self.action_id(n);
            graph.add_node(id.clone(), id, action_fn(|_| 0), AttributeSet::empty())?;
        }
        for &(dependent, dependency) in &self.edges {
            graph.add_edge(self.action_id(dependent), self.action_id(dependency))?;
        }
        Ok(graph)
    }

    /// Register the profile's no-op actions under `phase`.
    pub fn register(&self, registry: &mut PhaseRegistry, phase: &str) -> Result<(), GraphError> {
        for n in 0..self.len() {
            let id = self.action_id(n);
            registry.register_action(phase, id.clone(), id, action_fn(|_| 0), AttributeSet::empty())?;
        }
        for &(dependent, dependency) in &self.edges {
            registry.add_dependency(phase, self.action_id(dependent), self.action_id(dependency))?;
        }
        Ok(())
    }
}

/// Name of the `i`-th cycle phase in a [`layered_config`].
pub fn phase_name(i: usize) -> String {
    format!("phase_{i:02}")
}

/// A configuration with `phases` cycle phases and no setup or teardown.
pub fn layered_config(phases: usize, step_limit: u64) -> SchedulerConfig {
    SchedulerConfig::new((0..phases).map(phase_name)).with_step_limit(step_limit)
}

fn mix(seed: u64, a: u64, b: u64) -> u64 {
    let x = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(a.wrapping_mul(1442695040888963407))
        ^ b.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x ^ (x >> 29)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_engine::{Registrations, Scheduler};

    #[test]
    fn layered_profile_is_deterministic() {
        assert_eq!(LayeredProfile::new(8, 16, 42), LayeredProfile::new(8, 16, 42));
        assert_ne!(
            LayeredProfile::new(8, 16, 42).edges(),
            LayeredProfile::new(8, 16, 7).edges()
        );
    }

    #[test]
    fn edges_point_to_previous_layer() {
        let profile = LayeredProfile::new(6, 10, 3);
        for &(dependent, dependency) in profile.edges() {
            assert_eq!(dependent / 10, dependency / 10 + 1);
        }
    }

    #[test]
    fn layered_graph_sorts() {
        let profile = LayeredProfile::new(10, 20, 42);
        let mut graph = profile.build_graph("phase_00").unwrap();
        assert_eq!(graph.sort().unwrap().len(), 200);
        assert_eq!(profile.action_id(0), "l000_000");
        assert_eq!(profile.action_id(21), "l001_001");
    }

    #[test]
    fn layered_config_runs() {
        let profile = LayeredProfile::new(4, 4, 1);
        let mut sched = Scheduler::new(layered_config(3, 2)).unwrap();
        let mut regs = Registrations::new();
        for i in 0..3 {
            let profile = profile.clone();
            regs.push(phase_name(i), move |reg| profile.register(reg, &phase_name(i)));
        }
        sched.apply(regs).unwrap();
        let summary = sched.execute().unwrap();
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.actions_executed, 2 * 3 * 16);
    }
}
