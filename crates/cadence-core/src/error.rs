//! Error types for the Cadence control model.
//!
//! Organized by subsystem: graph construction and sorting (structural,
//! configuration-time), action execution, and the step loop.

use thiserror::Error;

use crate::id::{ActionId, PhaseId, StepId};

/// Structural errors raised while declaring or finalizing a phase graph.
///
/// These are configuration-time defects. They abort initialization and
/// are never recovered from silently. Every variant names the phase whose
/// graph raised it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An action with the same id is already registered in the phase.
    #[error("action '{action}' is already registered in phase '{phase}'")]
    DuplicateNode {
        /// Phase of the offending graph.
        phase: PhaseId,
        /// The duplicated action id.
        action: ActionId,
    },

    /// An edge or lookup referenced an action that is not registered.
    #[error("phase '{phase}' has no action '{action}'")]
    UnknownNode {
        /// Phase of the offending graph.
        phase: PhaseId,
        /// The missing action id.
        action: ActionId,
    },

    /// An action was declared as depending on itself.
    #[error("action '{action}' in phase '{phase}' cannot depend on itself")]
    InvalidEdge {
        /// Phase of the offending graph.
        phase: PhaseId,
        /// The self-referencing action id.
        action: ActionId,
    },

    /// Topological sort could not order every action.
    #[error(
        "dependency cycle in phase '{phase}' among actions [{}]",
        join_ids(.unresolved)
    )]
    CycleDetected {
        /// Phase of the offending graph.
        phase: PhaseId,
        /// Actions whose in-degree never reached zero, ascending.
        unresolved: Vec<ActionId>,
    },

    /// The graph was modified after initialization froze it.
    #[error("phase '{phase}' is frozen; actions and dependencies cannot be added after init")]
    RegistryFrozen {
        /// Phase of the frozen graph.
        phase: PhaseId,
    },

    /// A lookup referenced a phase the registry does not contain.
    #[error("unknown phase '{phase}'")]
    UnknownPhase {
        /// The missing phase id.
        phase: PhaseId,
    },

    /// A sorted order was requested before the phase was finalized.
    #[error("phase '{phase}' has not been sorted")]
    NotSorted {
        /// Phase whose order is not yet available.
        phase: PhaseId,
    },
}

fn join_ids(ids: &[ActionId]) -> String {
    ids.iter()
        .map(ActionId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from building an [`AttributeSet`](crate::AttributeSet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// The flag's bit index does not fit in the attribute width.
    #[error("attribute bit {bit} exceeds the {} available bits", crate::MAX_ATTRIBUTES)]
    OutOfRange {
        /// The offending bit index.
        bit: u8,
    },
}

/// Error returned by an action's callable.
///
/// The scheduler treats it purely as a signal; it never inspects the
/// code or reason beyond reporting them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The callable returned a non-zero status code.
    #[error("exited with status {code}")]
    Status {
        /// The returned status.
        code: i32,
    },

    /// The callable failed with a description.
    #[error("failed: {reason}")]
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl ActionError {
    /// Process exit code for this error: the status itself, or `1`.
    ///
    /// Never `0`, even for a `Status { code: 0 }` built by hand.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Status { code } if *code != 0 => *code,
            Self::Status { .. } | Self::Failed { .. } => 1,
        }
    }
}

/// An [`ActionError`] together with where it happened.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("action '{action}' in phase '{phase}' at step {step} {reason}")]
pub struct ActionFailure {
    /// Phase whose action failed.
    pub phase: PhaseId,
    /// The failing action.
    pub action: ActionId,
    /// Step counter value when the action ran.
    pub step: StepId,
    /// What the action reported.
    #[source]
    pub reason: ActionError,
}

impl ActionFailure {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        self.reason.exit_code()
    }
}

/// Errors from the scheduler's step loop.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StepError {
    /// An action failed and the failure policy aborted the run.
    #[error(transparent)]
    ActionFailed(#[from] ActionFailure),

    /// The scheduler has not been initialized.
    #[error("scheduler is not initialized")]
    NotInitialized,

    /// `init()` was called on an already-initialized scheduler.
    #[error("scheduler is already initialized")]
    AlreadyInitialized,

    /// The scheduler has completed and cannot execute further.
    #[error("scheduler has completed")]
    Completed,

    /// The requested phase is not registered.
    #[error("unknown phase '{phase}'")]
    UnknownPhase {
        /// The missing phase id.
        phase: PhaseId,
    },

    /// Initialization failed with a structural error.
    #[error("initialization failed: {0}")]
    Graph(#[from] GraphError),
}
