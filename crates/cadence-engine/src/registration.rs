//! [`Registrations`]: an explicit, ordered list of registration steps.
//!
//! Each entry is a named closure that adds actions and dependencies to a
//! [`PhaseRegistry`]. The program entry point collects them and applies
//! them before `init()`.

use std::fmt;

use cadence_core::GraphError;
use cadence_graph::PhaseRegistry;

type RegisterFn = Box<dyn FnOnce(&mut PhaseRegistry) -> Result<(), GraphError> + Send>;

/// Ordered, named registration closures.
#[derive(Default)]
pub struct Registrations {
    entries: Vec<(String, RegisterFn)>,
}

impl Registrations {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration step.
    pub fn with<F>(mut self, name: impl Into<String>, register: F) -> Self
    where
        F: FnOnce(&mut PhaseRegistry) -> Result<(), GraphError> + Send + 'static,
    {
        self.push(name, register);
        self
    }

    /// Append a registration step in place.
    pub fn push<F>(&mut self, name: impl Into<String>, register: F)
    where
        F: FnOnce(&mut PhaseRegistry) -> Result<(), GraphError> + Send + 'static,
    {
        self.entries.push((name.into(), Box::new(register)));
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no steps.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step names in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Run every step in order, stopping at the first error.
    pub fn apply(self, registry: &mut PhaseRegistry) -> Result<(), GraphError> {
        for (name, register) in self.entries {
            tracing::debug!(registration = %name, "applying registration");
            register(registry)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Registrations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
