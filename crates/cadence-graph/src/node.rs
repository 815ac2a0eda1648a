//! [`ActionNode`]: a registered action with its identity and attributes.

use std::fmt;

use cadence_core::{ActionError, ActionId, AttributeFlag, AttributeSet};

use crate::action::{Action, ActionContext};

/// A node of a phase's dependency graph.
///
/// Immutable once added to a graph. Dependency edges are owned by the
/// graph, not the node.
pub struct ActionNode {
    id: ActionId,
    name: String,
    attributes: AttributeSet,
    action: Box<dyn Action>,
}

impl ActionNode {
    /// Create a node. `name` is only used for diagnostics.
    pub fn new(
        id: impl Into<ActionId>,
        name: impl Into<String>,
        action: impl Action,
        attributes: AttributeSet,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes,
            action: Box::new(action),
        }
    }

    /// Identifier, unique within the owning phase.
    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes assigned at registration.
    pub fn attributes(&self) -> AttributeSet {
        self.attributes
    }

    /// Whether this node was registered with `flag`.
    pub fn has_attribute<F: AttributeFlag>(&self, flag: F) -> bool {
        self.attributes.contains(flag)
    }

    /// Invoke the node's action.
    pub fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        self.action.execute(ctx)
    }
}

impl fmt::Debug for ActionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}
