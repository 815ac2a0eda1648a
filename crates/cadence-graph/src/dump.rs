//! Plain-data snapshots of a phase graph.

use std::fmt;

use cadence_core::{ActionId, AttributeSet, PhaseId};

/// One node of a [`GraphDump`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSummary {
    /// Action id.
    pub id: ActionId,
    /// Diagnostic name.
    pub name: String,
    /// Registered attributes.
    pub attributes: AttributeSet,
}

/// Nodes and edges of one phase, both ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphDump {
    /// Phase the graph belongs to.
    pub phase: PhaseId,
    /// Registered nodes.
    pub nodes: Vec<NodeSummary>,
    /// `(dependent, dependency)` pairs.
    pub edges: Vec<(ActionId, ActionId)>,
}

impl fmt::Display for GraphDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "phase {}", self.phase)?;
        for node in &self.nodes {
            write!(f, "  {} \"{}\"", node.id, node.name)?;
            if !node.attributes.is_empty() {
                write!(f, " attrs={:#x}", node.attributes.bits())?;
            }
            writeln!(f)?;
        }
        for (dependent, dependency) in &self.edges {
            writeln!(f, "  {dependent} after {dependency}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_nodes_then_edges() {
        let dump = GraphDump {
            phase: PhaseId::new("initialize"),
            nodes: vec![
                NodeSummary {
                    id: ActionId::new("init_fields"),
                    name: "fields".into(),
                    attributes: AttributeSet::empty(),
                },
                NodeSummary {
                    id: ActionId::new("init_mesh"),
                    name: "mesh".into(),
                    attributes: AttributeSet::from_bits(0x4),
                },
            ],
            edges: vec![(ActionId::new("init_fields"), ActionId::new("init_mesh"))],
        };
        assert_eq!(
            dump.to_string(),
            "phase initialize\n  init_fields \"fields\"\n  init_mesh \"mesh\" attrs=0x4\n  init_fields after init_mesh\n"
        );
    }
}
