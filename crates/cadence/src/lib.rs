//! Cadence: a phase-based action dependency scheduler for step-driven simulations.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Cadence sub-crates. For most users, adding `cadence` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cadence::prelude::*;
//!
//! #[derive(Clone, Copy)]
//! enum Advance {
//!     Half,
//! }
//!
//! impl AttributeFlag for Advance {
//!     fn bit(self) -> u8 {
//!         self as u8
//!     }
//! }
//!
//! let config = SchedulerConfig::new(["advance", "io"])
//!     .with_setup(["initialize"])
//!     .with_step_limit(5);
//! let mut sched = Scheduler::new(config).unwrap();
//!
//! sched
//!     .register_action("initialize", "init_mesh", "mesh", action_fn(|_| 0), AttributeSet::empty())
//!     .unwrap();
//! sched
//!     .register_action(
//!         "advance",
//!         "accumulate_currents",
//!         "currents",
//!         action_fn(|_| 0),
//!         AttributeSet::empty().with(Advance::Half).unwrap(),
//!     )
//!     .unwrap();
//! sched
//!     .register_action(
//!         "advance",
//!         "update_fields",
//!         "fields",
//!         action_fn(|ctx| match ctx.query_attribute("accumulate_currents", Advance::Half) {
//!             Ok(true) => 0,
//!             _ => 1,
//!         }),
//!         AttributeSet::empty(),
//!     )
//!     .unwrap();
//! sched
//!     .add_dependency("advance", "update_fields", "accumulate_currents")
//!     .unwrap();
//!
//! let summary = sched.execute().unwrap();
//! assert_eq!(summary.steps, 5);
//! assert!(summary.is_success());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cadence-core` | IDs, attribute sets, error types |
//! | [`graph`] | `cadence-graph` | Action trait, dependency graphs, phase registry, DOT export |
//! | [`engine`] | `cadence-engine` | Scheduler, configuration, clock, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and errors (`cadence-core`).
///
/// Identifiers ([`types::PhaseId`], [`types::ActionId`], [`types::StepId`]),
/// the [`types::AttributeSet`] bitset, and every error enum.
pub use cadence_core as types;

/// Actions and dependency graphs (`cadence-graph`).
///
/// The [`graph::Action`] trait is the main extension point for
/// user-defined simulation work.
pub use cadence_graph as graph;

/// The step-driven scheduler (`cadence-engine`).
pub use cadence_engine as engine;

/// Common imports for typical Cadence usage.
///
/// ```rust
/// use cadence::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use cadence_core::{
        ActionId, Attribute, AttributeFlag, AttributeSet, PhaseId, StepId,
    };

    // Errors
    pub use cadence_core::{ActionError, ActionFailure, GraphError, StepError};

    // Actions and graphs
    pub use cadence_graph::{
        action_fn, try_action_fn, Action, ActionContext, PhaseRegistry, PhaseSchedule,
    };

    // Engine
    pub use cadence_engine::{
        ConfigError, FailurePolicy, Registrations, RunSummary, Scheduler, SchedulerConfig,
        SchedulerState, StepMetrics,
    };
}
