//! Strongly-typed identifiers for phases, actions, and steps.
//!
//! Phase and action identifiers are string-backed and compared by their
//! full contents. Two distinct names can never collapse into one node.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identifies a phase (control point) of the simulation lifecycle.
///
/// Cloning is a reference-count bump. Ordering is lexicographic on the
/// underlying string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseId(Arc<str>);

impl PhaseId {
    /// Create a phase identifier from a name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhaseId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for PhaseId {
    fn from(v: String) -> Self {
        Self(Arc::from(v))
    }
}

impl From<&PhaseId> for PhaseId {
    fn from(v: &PhaseId) -> Self {
        v.clone()
    }
}

impl AsRef<str> for PhaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PhaseId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifies an action within its phase.
///
/// The same action id may appear in several phases; uniqueness is only
/// enforced per phase graph. Ordering is lexicographic and is the
/// tie-break rule used by the topological sort.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(Arc<str>);

impl ActionId {
    /// Create an action identifier from a name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for ActionId {
    fn from(v: String) -> Self {
        Self(Arc::from(v))
    }
}

impl From<&ActionId> for ActionId {
    fn from(v: &ActionId) -> Self {
        v.clone()
    }
}

impl AsRef<str> for ActionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Monotonically increasing step counter.
///
/// Incremented each time the scheduler completes one pass through the
/// per-step phase cycle. Never rewound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl StepId {
    /// The step that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
