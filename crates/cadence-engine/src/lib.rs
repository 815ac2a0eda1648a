//! Step-driven scheduler for Cadence control models.
//!
//! Provides the [`Scheduler`] state machine that finalizes a
//! [`PhaseRegistry`](cadence_graph::PhaseRegistry), then runs setup
//! phases once, the per-step phase cycle until the step limit, and
//! teardown phases once.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod metrics;
pub mod registration;
pub mod scheduler;

pub use clock::SimulationClock;
pub use config::{ConfigError, FailurePolicy, SchedulerConfig};
pub use metrics::{RunSummary, StepMetrics};
pub use registration::Registrations;
pub use scheduler::{Scheduler, SchedulerState};
