//! The [`Action`] trait and the [`ActionContext`] handed to each call.
//!
//! Actions are opaque units of work registered under a phase. The
//! scheduler invokes them synchronously in dependency order and treats
//! their result purely as a success/failure signal.

use cadence_core::{ActionError, ActionId, AttributeFlag, GraphError, PhaseId, StepId};

use crate::registry::PhaseRegistry;

/// A unit of work executed once per visit of its phase.
///
/// # Contract
///
/// - `&self`: actions keep no scheduler-visible mutable state. Anything
///   they need to carry across calls goes through interior mutability
///   or an external collaborator.
/// - `execute()` blocks until its work is done, even if it dispatches to
///   a parallel backend internally.
///
/// # Object safety
///
/// This trait is object-safe; graphs store actions as `Box<dyn Action>`.
///
/// # Examples
///
/// ```
/// use cadence_core::ActionError;
/// use cadence_graph::{Action, ActionContext};
///
/// struct RestartDump {
///     every: u64,
/// }
///
/// impl Action for RestartDump {
///     fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
///         if ctx.step().0 % self.every == 0 {
///             // write the checkpoint
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Action: Send + 'static {
    /// Run the action.
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError>;
}

/// An [`Action`] backed by a closure returning an integer status.
///
/// Built by [`action_fn`].
pub struct FnAction<F>(F);

impl<F> Action for FnAction<F>
where
    F: Fn(&ActionContext<'_>) -> i32 + Send + 'static,
{
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        match (self.0)(ctx) {
            0 => Ok(()),
            code => Err(ActionError::Status { code }),
        }
    }
}

/// Wrap a status-returning closure as an [`Action`].
///
/// A return value of `0` is success; anything else becomes
/// [`ActionError::Status`].
pub fn action_fn<F>(f: F) -> FnAction<F>
where
    F: Fn(&ActionContext<'_>) -> i32 + Send + 'static,
{
    FnAction(f)
}

/// An [`Action`] backed by a closure returning `Result`.
///
/// Built by [`try_action_fn`].
pub struct TryFnAction<F>(F);

impl<F> Action for TryFnAction<F>
where
    F: Fn(&ActionContext<'_>) -> Result<(), ActionError> + Send + 'static,
{
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        (self.0)(ctx)
    }
}

/// Wrap a `Result`-returning closure as an [`Action`].
pub fn try_action_fn<F>(f: F) -> TryFnAction<F>
where
    F: Fn(&ActionContext<'_>) -> Result<(), ActionError> + Send + 'static,
{
    TryFnAction(f)
}

/// Read-only view of the scheduler handed to an executing action.
///
/// Borrows the registry immutably, so an action can inspect the
/// registered attributes of its peers but can never add actions or
/// dependencies.
pub struct ActionContext<'a> {
    registry: &'a PhaseRegistry,
    phase: &'a PhaseId,
    action: &'a ActionId,
    step: StepId,
    args: &'a [String],
}

impl<'a> ActionContext<'a> {
    /// Create a context for executing `action` of `phase` at `step`.
    pub fn new(
        registry: &'a PhaseRegistry,
        phase: &'a PhaseId,
        action: &'a ActionId,
        step: StepId,
        args: &'a [String],
    ) -> Self {
        Self {
            registry,
            phase,
            action,
            step,
            args,
        }
    }

    /// The process argument vector configured for the run.
    pub fn args(&self) -> &'a [String] {
        self.args
    }

    /// Number of arguments in [`args()`](Self::args).
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// Phase currently executing.
    pub fn phase(&self) -> &'a PhaseId {
        self.phase
    }

    /// The action being executed.
    pub fn action(&self) -> &'a ActionId {
        self.action
    }

    /// Current value of the step counter.
    pub fn step(&self) -> StepId {
        self.step
    }

    /// The registry, for read-only inspection.
    pub fn registry(&self) -> &'a PhaseRegistry {
        self.registry
    }

    /// Whether `action` in the current phase was registered with `flag`.
    pub fn query_attribute<F: AttributeFlag>(
        &self,
        action: impl AsRef<str>,
        flag: F,
    ) -> Result<bool, GraphError> {
        self.registry.query_attribute(self.phase, action, flag)
    }

    /// Whether `action` in `phase` was registered with `flag`.
    pub fn query_attribute_in<F: AttributeFlag>(
        &self,
        phase: impl AsRef<str>,
        action: impl AsRef<str>,
        flag: F,
    ) -> Result<bool, GraphError> {
        self.registry.query_attribute(phase, action, flag)
    }
}

impl std::fmt::Debug for ActionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("phase", self.phase)
            .field("action", self.action)
            .field("step", &self.step)
            .field("argc", &self.args.len())
            .finish()
    }
}
