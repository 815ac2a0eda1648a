//! Test utilities and fixture actions for Cadence development.
//!
//! Provides [`Action`] implementations that record, count, or fail on
//! demand, a shared [`TraceLog`], and the particle-in-cell control model
//! used across integration tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod pic;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cadence_core::ActionError;
use cadence_graph::{Action, ActionContext};

/// Shared, ordered log of executed actions.
///
/// Cloning shares the underlying buffer.
#[derive(Clone, Debug, Default)]
pub struct TraceLog(Arc<Mutex<Vec<String>>>);

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    /// Snapshot of every entry so far.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// How many entries equal `entry`.
    pub fn count(&self, entry: &str) -> usize {
        self.lock().iter().filter(|e| e.as_str() == entry).count()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Appends `"{phase}/{action}"` to a [`TraceLog`] on every call.
pub struct RecordingAction {
    log: TraceLog,
}

impl RecordingAction {
    pub fn new(log: &TraceLog) -> Self {
        Self { log: log.clone() }
    }
}

impl Action for RecordingAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        self.log.push(format!("{}/{}", ctx.phase(), ctx.action()));
        Ok(())
    }
}

/// Counts its invocations.
///
/// Uses `AtomicUsize` because [`Action::execute`] takes `&self`.
pub struct CountingAction {
    count: Arc<AtomicUsize>,
}

impl CountingAction {
    /// Returns the action and a handle to its counter.
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        (
            Self {
                count: Arc::clone(&count),
            },
            count,
        )
    }
}

impl Action for CountingAction {
    fn execute(&self, _ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Fails with a status code, either always or on one particular call.
pub struct FailingAction {
    calls: AtomicUsize,
    fail_on: Option<usize>,
    code: i32,
}

impl FailingAction {
    /// Fails on every call.
    pub fn always(code: i32) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: None,
            code,
        }
    }

    /// Succeeds except on the `nth` call (1-based).
    pub fn on_call(nth: usize, code: i32) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: Some(nth),
            code,
        }
    }
}

impl Action for FailingAction {
    fn execute(&self, _ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        match self.fail_on {
            Some(nth) if nth != call => Ok(()),
            _ => Err(ActionError::Status { code: self.code }),
        }
    }
}
