//! Graphviz DOT rendering of a registry.
//!
//! [`control_model`] draws every phase as a cluster with its dependency
//! edges; [`sorted_model`] draws the execution order produced by
//! finalize. Both chain the phases in schedule order and mark the
//! per-step loop with a back edge labelled `cycle`.

use std::fmt;

use cadence_core::{ActionId, GraphError, PhaseId};

use crate::registry::PhaseRegistry;

/// Display adapter rendering the declared control model.
#[derive(Debug)]
pub struct ControlModel<'a> {
    registry: &'a PhaseRegistry,
}

/// Display adapter rendering the sorted control model.
#[derive(Debug)]
pub struct SortedModel<'a> {
    registry: &'a PhaseRegistry,
}

/// Render the declared phases, actions, and dependencies.
pub fn control_model(registry: &PhaseRegistry) -> ControlModel<'_> {
    ControlModel { registry }
}

/// Render the sorted execution order.
///
/// # Errors
///
/// [`GraphError::NotSorted`] if the registry has not been finalized.
pub fn sorted_model(registry: &PhaseRegistry) -> Result<SortedModel<'_>, GraphError> {
    for phase in registry.phases() {
        registry.sorted(phase)?;
    }
    Ok(SortedModel { registry })
}

/// Scheduled phases in schedule order, then the rest ascending.
fn render_order(registry: &PhaseRegistry) -> Vec<&PhaseId> {
    let schedule = registry.schedule();
    let mut phases: Vec<&PhaseId> = schedule.all().collect();
    phases.extend(
        registry
            .phases()
            .into_iter()
            .filter(|p| !schedule.contains(p)),
    );
    phases
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn phase_node(phase: &PhaseId) -> String {
    format!("\"phase:{}\"", escape(phase.as_str()))
}

fn action_node(phase: &PhaseId, action: &ActionId) -> String {
    format!("\"{}/{}\"", escape(phase.as_str()), escape(action.as_str()))
}

fn write_phase_chain(f: &mut fmt::Formatter<'_>, registry: &PhaseRegistry) -> fmt::Result {
    let schedule = registry.schedule();
    for phase in render_order(registry) {
        writeln!(
            f,
            "    {} [label=\"{}\", shape=box, style=\"rounded,filled\", fillcolor=\"#c5def5\"];",
            phase_node(phase),
            escape(phase.as_str())
        )?;
    }
    let chain: Vec<&PhaseId> = schedule.all().collect();
    for pair in chain.windows(2) {
        writeln!(f, "    {} -> {};", phase_node(pair[0]), phase_node(pair[1]))?;
    }
    if let (Some(first), Some(last)) = (schedule.cycle.first(), schedule.cycle.last()) {
        writeln!(
            f,
            "    {} -> {} [label=\"cycle\", color=\"#1d76db\", style=bold];",
            phase_node(last),
            phase_node(first)
        )?;
    }
    Ok(())
}

impl fmt::Display for ControlModel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph control_model {{")?;
        writeln!(f, "    compound=true;")?;
        write_phase_chain(f, self.registry)?;

        for phase in render_order(self.registry) {
            let Ok(graph) = self.registry.graph(phase) else {
                continue;
            };
            writeln!(f, "    subgraph \"cluster_{}\" {{", escape(phase.as_str()))?;
            writeln!(f, "        label=\"{}\";", escape(phase.as_str()))?;
            for node in graph.nodes() {
                writeln!(
                    f,
                    "        {} [label=\"{}\"];",
                    action_node(phase, node.id()),
                    escape(node.name())
                )?;
            }
            writeln!(f, "    }}")?;

            for node in graph.nodes() {
                if graph
                    .dependencies_of(node.id())
                    .is_ok_and(|deps| deps.is_empty())
                {
                    writeln!(
                        f,
                        "    {} -> {} [style=dashed];",
                        phase_node(phase),
                        action_node(phase, node.id())
                    )?;
                }
            }
            for (dependent, dependency) in graph.edges() {
                writeln!(
                    f,
                    "    {} -> {};",
                    action_node(phase, dependency),
                    action_node(phase, dependent)
                )?;
            }
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for SortedModel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph control_model_sorted {{")?;
        write_phase_chain(f, self.registry)?;

        for phase in render_order(self.registry) {
            let Ok(order) = self.registry.sorted(phase) else {
                continue;
            };
            writeln!(f, "    subgraph \"cluster_{}\" {{", escape(phase.as_str()))?;
            writeln!(f, "        label=\"{}\";", escape(phase.as_str()))?;
            for (position, action) in order.iter().enumerate() {
                writeln!(
                    f,
                    "        {} [label=\"{}. {}\"];",
                    action_node(phase, action),
                    position + 1,
                    escape(action.as_str())
                )?;
            }
            writeln!(f, "    }}")?;

            let mut previous = phase_node(phase);
            for action in order {
                let current = action_node(phase, action);
                writeln!(f, "    {previous} -> {current} [style=dashed];")?;
                previous = current;
            }
        }
        writeln!(f, "}}")
    }
}
