//! Core types for the Cadence control model.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Cadence workspace:
//! typed identifiers, attribute flags, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod error;
pub mod id;

pub use attribute::{Attribute, AttributeFlag, AttributeSet, MAX_ATTRIBUTES};
pub use error::{ActionError, ActionFailure, AttributeError, GraphError, StepError};
pub use id::{ActionId, PhaseId, StepId};
