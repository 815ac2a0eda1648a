//! Per-phase action dependency graphs for Cadence.
//!
//! Each phase owns a [`DependencyGraph`] of [`ActionNode`]s. The
//! [`PhaseRegistry`] maps phases to graphs, sorts them all at finalize
//! time, and freezes them. The [`Action`] trait is the unit of work the
//! scheduler invokes, with an [`ActionContext`] giving read-only access
//! to the registry.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod dot;
pub mod dump;
pub mod graph;
pub mod node;
pub mod registry;
pub mod schedule;

pub use action::{action_fn, try_action_fn, Action, ActionContext, FnAction, TryFnAction};
pub use dot::{control_model, sorted_model, ControlModel, SortedModel};
pub use dump::{GraphDump, NodeSummary};
pub use graph::DependencyGraph;
pub use node::ActionNode;
pub use registry::PhaseRegistry;
pub use schedule::PhaseSchedule;
