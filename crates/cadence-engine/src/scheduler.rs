//! [`Scheduler`]: the step-driven state machine that runs phase graphs.
//!
//! A scheduler owns its [`PhaseRegistry`] and [`SimulationClock`]. It
//! moves through `Uninitialized → Initialized → Running → Completed` and
//! never returns to an earlier state.
//!
//! # Driving a run
//!
//! [`execute()`](Scheduler::execute) is the whole loop: `init()`, the
//! setup phases once, [`step()`](Scheduler::step) while
//! `run(step_limit)` holds, then the teardown phases. Callers that need
//! control between steps drive it by hand:
//!
//! ```
//! use cadence_core::AttributeSet;
//! use cadence_engine::{Scheduler, SchedulerConfig};
//! use cadence_graph::action_fn;
//!
//! let mut sched = Scheduler::new(SchedulerConfig::new(["advance"])).unwrap();
//! sched
//!     .register_action("advance", "push", "push particles", action_fn(|_| 0), AttributeSet::empty())
//!     .unwrap();
//! sched.init().unwrap();
//! sched.setup().unwrap();
//! while sched.run(3) {
//!     sched.step().unwrap();
//! }
//! sched.complete().unwrap();
//! assert_eq!(sched.current_step().0, 3);
//! ```

use std::fmt;
use std::time::Instant;

use cadence_core::{
    ActionFailure, ActionId, AttributeFlag, AttributeSet, GraphError, PhaseId, StepError, StepId,
};
use cadence_graph::{Action, ActionContext, PhaseRegistry};

use crate::clock::SimulationClock;
use crate::config::{ConfigError, FailurePolicy, SchedulerConfig};
use crate::metrics::{RunSummary, StepMetrics};
use crate::registration::Registrations;

/// Lifecycle state of a [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Accepting registrations.
    Uninitialized,
    /// Graphs sorted and frozen; nothing executed yet.
    Initialized,
    /// At least one phase has executed.
    Running,
    /// Finished, either normally or after an aborting failure.
    Completed,
}

type FailureHook = Box<dyn FnMut(&ActionFailure) + Send>;

/// Runs the registered phase graphs step by step.
pub struct Scheduler {
    config: SchedulerConfig,
    registry: PhaseRegistry,
    clock: SimulationClock,
    state: SchedulerState,
    on_failure: Option<FailureHook>,
    last_metrics: StepMetrics,
    actions_executed: u64,
    failures: Vec<ActionFailure>,
    setup_done: bool,
}

impl Scheduler {
    /// Validate `config` and build an empty scheduler.
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = PhaseRegistry::new(config.schedule.clone());
        let clock = SimulationClock::new(config.step_limit);
        Ok(Self {
            config,
            registry,
            clock,
            state: SchedulerState::Uninitialized,
            on_failure: None,
            last_metrics: StepMetrics::default(),
            actions_executed: 0,
            failures: Vec::new(),
            setup_done: false,
        })
    }

    // ── Registration ───────────────────────────────────────────

    /// Register an action under `phase`.
    pub fn register_action(
        &mut self,
        phase: impl Into<PhaseId>,
        id: impl Into<ActionId>,
        name: impl Into<String>,
        action: impl Action,
        attributes: AttributeSet,
    ) -> Result<(), GraphError> {
        self.registry
            .register_action(phase, id, name, action, attributes)
    }

    /// Declare that `dependent` runs after `dependency` within `phase`.
    pub fn add_dependency(
        &mut self,
        phase: impl AsRef<str>,
        dependent: impl AsRef<str>,
        dependency: impl AsRef<str>,
    ) -> Result<(), GraphError> {
        self.registry.add_dependency(phase, dependent, dependency)
    }

    /// Apply a list of registration steps in order.
    pub fn apply(&mut self, registrations: Registrations) -> Result<(), GraphError> {
        registrations.apply(&mut self.registry)
    }

    /// Whether `action` in `phase` was registered with `flag`.
    pub fn query_attribute<F: AttributeFlag>(
        &self,
        phase: impl AsRef<str>,
        action: impl AsRef<str>,
        flag: F,
    ) -> Result<bool, GraphError> {
        self.registry.query_attribute(phase, action, flag)
    }

    /// Install a hook called once for every action failure.
    ///
    /// The hook runs before the failure policy is applied and does not
    /// by itself stop the run.
    pub fn on_failure(&mut self, hook: impl FnMut(&ActionFailure) + Send + 'static) {
        self.on_failure = Some(Box::new(hook));
    }

    // ── Lifecycle ──────────────────────────────────────────────

    /// Sort and freeze every phase graph.
    ///
    /// # Errors
    ///
    /// [`StepError::AlreadyInitialized`] on a second call. Any sort
    /// failure comes back as [`StepError::Graph`] and the scheduler stays
    /// `Uninitialized`.
    pub fn init(&mut self) -> Result<(), StepError> {
        if self.state != SchedulerState::Uninitialized {
            return Err(StepError::AlreadyInitialized);
        }
        self.registry.finalize()?;
        self.state = SchedulerState::Initialized;
        tracing::info!(
            cycle = self.registry.phase_order().len(),
            step_limit = self.config.step_limit,
            "scheduler initialized"
        );
        Ok(())
    }

    /// Execute the setup phases. Runs them once; later calls do nothing.
    ///
    /// [`step()`](Self::step), [`complete()`](Self::complete) and
    /// [`execute_phase()`](Self::execute_phase) on any non-setup phase run
    /// pending setup first, so setup always precedes the cycle and the
    /// teardown.
    pub fn setup(&mut self) -> Result<(), StepError> {
        self.ensure_executable()?;
        self.run_pending_setup()
    }

    /// Execute the actions of one phase in sorted order.
    ///
    /// # Errors
    ///
    /// [`StepError::NotInitialized`] before `init()`,
    /// [`StepError::Completed`] after completion,
    /// [`StepError::UnknownPhase`] for an unregistered phase, and
    /// [`StepError::ActionFailed`] under [`FailurePolicy::AbortRun`].
    pub fn execute_phase(&mut self, phase: impl AsRef<str>) -> Result<(), StepError> {
        self.ensure_executable()?;
        let phase = match self.registry.graph(phase.as_ref()) {
            Ok(graph) => graph.phase().clone(),
            Err(_) => {
                return Err(StepError::UnknownPhase {
                    phase: PhaseId::new(phase),
                })
            }
        };
        if !self.config.schedule.setup.contains(&phase) {
            self.run_pending_setup()?;
        }
        self.state = SchedulerState::Running;
        let mut metrics = StepMetrics {
            step: self.clock.step(),
            ..StepMetrics::default()
        };
        self.run_phase(&phase, &mut metrics)
    }

    /// Increment the step counter and return its new value.
    pub fn advance(&mut self) -> Result<StepId, StepError> {
        self.ensure_executable()?;
        Ok(self.clock.advance())
    }

    /// Whether the current step is strictly below `limit`.
    pub fn run(&self, limit: u64) -> bool {
        self.clock.run(limit)
    }

    /// Execute every cycle phase in order, then advance the clock.
    ///
    /// On an aborting failure the clock is not advanced and the partial
    /// metrics are still available from [`last_metrics()`](Self::last_metrics).
    pub fn step(&mut self) -> Result<StepMetrics, StepError> {
        self.ensure_executable()?;
        self.run_pending_setup()?;
        self.state = SchedulerState::Running;
        let started = Instant::now();
        let mut metrics = StepMetrics {
            step: self.clock.step(),
            ..StepMetrics::default()
        };

        let phases = self.registry.phase_order().to_vec();
        for phase in &phases {
            if let Err(e) = self.run_phase(phase, &mut metrics) {
                metrics.total_us = elapsed_us(started);
                self.last_metrics = metrics;
                return Err(e);
            }
        }
        self.clock.advance();
        metrics.total_us = elapsed_us(started);
        self.last_metrics = metrics.clone();
        Ok(metrics)
    }

    /// Execute the teardown phases and move to `Completed`.
    pub fn complete(&mut self) -> Result<(), StepError> {
        self.ensure_executable()?;
        self.run_pending_setup()?;
        let phases = self.config.schedule.teardown.clone();
        let mut metrics = StepMetrics {
            step: self.clock.step(),
            ..StepMetrics::default()
        };
        for phase in &phases {
            self.run_phase(phase, &mut metrics)?;
        }
        self.state = SchedulerState::Completed;
        Ok(())
    }

    /// Run the whole lifecycle up to the configured step limit.
    ///
    /// Calls `init()` first if it has not been called.
    pub fn execute(&mut self) -> Result<RunSummary, StepError> {
        if self.state == SchedulerState::Uninitialized {
            self.init()?;
        }
        self.setup()?;
        let limit = self.config.step_limit;
        while self.run(limit) {
            self.step()?;
        }
        self.complete()?;

        let summary = self.summary();
        tracing::info!(
            steps = summary.steps,
            actions = summary.actions_executed,
            failures = summary.failures.len(),
            "run complete"
        );
        Ok(summary)
    }

    // ── Accessors ──────────────────────────────────────────────

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Current value of the step counter.
    pub fn current_step(&self) -> StepId {
        self.clock.step()
    }

    /// The phase registry, for read-only inspection.
    pub fn registry(&self) -> &PhaseRegistry {
        &self.registry
    }

    /// The configuration this scheduler was built from.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Metrics from the most recent [`step()`](Self::step).
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Every failure recorded so far.
    pub fn failures(&self) -> &[ActionFailure] {
        &self.failures
    }

    /// Totals so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            steps: self.clock.step().0,
            actions_executed: self.actions_executed,
            failures: self.failures.clone(),
        }
    }

    // ── Internals ──────────────────────────────────────────────

    fn ensure_executable(&self) -> Result<(), StepError> {
        match self.state {
            SchedulerState::Uninitialized => Err(StepError::NotInitialized),
            SchedulerState::Completed => Err(StepError::Completed),
            SchedulerState::Initialized | SchedulerState::Running => Ok(()),
        }
    }

    fn run_pending_setup(&mut self) -> Result<(), StepError> {
        if self.setup_done {
            return Ok(());
        }
        self.setup_done = true;
        self.state = SchedulerState::Running;
        let phases = self.config.schedule.setup.clone();
        let mut metrics = StepMetrics {
            step: self.clock.step(),
            ..StepMetrics::default()
        };
        for phase in &phases {
            self.run_phase(phase, &mut metrics)?;
        }
        Ok(())
    }

    fn run_phase(&mut self, phase: &PhaseId, metrics: &mut StepMetrics) -> Result<(), StepError> {
        let started = Instant::now();
        let step = self.clock.step();
        let (executed, failure) = {
            let graph = self.registry.graph(phase)?;
            let order = self.registry.sorted(phase)?;
            let mut executed = 0u64;
            let mut failure = None;
            for id in order {
                let node = graph.node(id)?;
                let ctx = ActionContext::new(&self.registry, phase, id, step, &self.config.args);
                tracing::debug!(%phase, action = %id, step = step.0, "executing action");
                let action_started = Instant::now();
                let result = node.execute(&ctx);
                metrics.action_us.push((id.clone(), elapsed_us(action_started)));
                executed += 1;
                if let Err(reason) = result {
                    failure = Some(ActionFailure {
                        phase: phase.clone(),
                        action: id.clone(),
                        step,
                        reason,
                    });
                    break;
                }
            }
            (executed, failure)
        };
        self.actions_executed += executed;
        metrics.phase_us.push((phase.clone(), elapsed_us(started)));

        match failure {
            None => Ok(()),
            Some(failure) => self.handle_failure(failure, metrics),
        }
    }

    fn handle_failure(
        &mut self,
        failure: ActionFailure,
        metrics: &mut StepMetrics,
    ) -> Result<(), StepError> {
        tracing::warn!(
            phase = %failure.phase,
            action = %failure.action,
            step = failure.step.0,
            error = %failure.reason,
            "action failed"
        );
        metrics.failed_actions += 1;
        if let Some(hook) = self.on_failure.as_mut() {
            hook(&failure);
        }
        self.failures.push(failure.clone());
        match self.config.failure_policy {
            FailurePolicy::AbortPhase => Ok(()),
            FailurePolicy::AbortRun => {
                self.state = SchedulerState::Completed;
                Err(StepError::ActionFailed(failure))
            }
        }
    }
}

fn elapsed_us(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("step", &self.clock.step())
            .field("registry", &self.registry)
            .field("failures", &self.failures.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{ActionError, Attribute};
    use cadence_graph::action_fn;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn config() -> SchedulerConfig {
        SchedulerConfig::new(["advance", "io"])
            .with_setup(["initialize"])
            .with_teardown(["finalize"])
            .with_step_limit(3)
    }

    fn counter(count: &Arc<AtomicUsize>) -> impl Action {
        let count = Arc::clone(count);
        action_fn(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
            0
        })
    }

    // ── State machine ──────────────────────────────────────────

    #[test]
    fn new_rejects_invalid_config() {
        let err = Scheduler::new(SchedulerConfig::new(Vec::<&str>::new())).unwrap_err();
        assert_eq!(err, ConfigError::EmptyCycle);
    }

    #[test]
    fn execution_requires_init() {
        let mut sched = Scheduler::new(config()).unwrap();
        assert_eq!(sched.state(), SchedulerState::Uninitialized);
        assert_eq!(sched.execute_phase("advance"), Err(StepError::NotInitialized));
        assert_eq!(sched.advance(), Err(StepError::NotInitialized));
        assert!(matches!(sched.step(), Err(StepError::NotInitialized)));
        assert_eq!(sched.current_step(), StepId(0));
    }

    #[test]
    fn init_only_once() {
        let mut sched = Scheduler::new(config()).unwrap();
        sched.init().unwrap();
        assert_eq!(sched.state(), SchedulerState::Initialized);
        assert_eq!(sched.init(), Err(StepError::AlreadyInitialized));
        assert_eq!(sched.state(), SchedulerState::Initialized);
    }

    #[test]
    fn failed_init_stays_uninitialized() {
        let mut sched = Scheduler::new(config()).unwrap();
        for id in ["a", "b"] {
            sched
                .register_action("io", id, id, action_fn(|_| 0), AttributeSet::empty())
                .unwrap();
        }
        sched.add_dependency("io", "a", "b").unwrap();
        sched.add_dependency("io", "b", "a").unwrap();

        match sched.init() {
            Err(StepError::Graph(GraphError::CycleDetected { phase, unresolved })) => {
                assert_eq!(phase.as_str(), "io");
                assert_eq!(unresolved.len(), 2);
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
        assert_eq!(sched.state(), SchedulerState::Uninitialized);
        assert!(!sched.registry().is_finalized());
    }

    #[test]
    fn registration_after_init_is_frozen() {
        let mut sched = Scheduler::new(config()).unwrap();
        sched
            .register_action("advance", "push", "push", action_fn(|_| 0), AttributeSet::empty())
            .unwrap();
        sched.init().unwrap();
        assert!(matches!(
            sched.register_action("advance", "late", "late", action_fn(|_| 0), AttributeSet::empty()),
            Err(GraphError::RegistryFrozen { .. })
        ));
        assert!(matches!(
            sched.add_dependency("advance", "push", "push"),
            Err(GraphError::RegistryFrozen { .. })
        ));
    }

    #[test]
    fn unknown_phase_rejected() {
        let mut sched = Scheduler::new(config()).unwrap();
        sched.init().unwrap();
        match sched.execute_phase("mesh") {
            Err(StepError::UnknownPhase { phase }) => assert_eq!(phase.as_str(), "mesh"),
            other => panic!("expected UnknownPhase, got {other:?}"),
        }
        assert_eq!(sched.state(), SchedulerState::Initialized);
    }

    #[test]
    fn run_and_advance() {
        let mut sched = Scheduler::new(config()).unwrap();
        sched.init().unwrap();
        assert!(sched.run(3));
        assert_eq!(sched.advance(), Ok(StepId(1)));
        assert_eq!(sched.advance(), Ok(StepId(2)));
        assert_eq!(sched.advance(), Ok(StepId(3)));
        assert!(!sched.run(3));
        assert!(sched.run(4));
    }

    // ── Execution ──────────────────────────────────────────────

    #[test]
    fn execute_runs_setup_cycle_teardown() {
        let setup = Arc::new(AtomicUsize::new(0));
        let cycle = Arc::new(AtomicUsize::new(0));
        let teardown = Arc::new(AtomicUsize::new(0));
        let mut sched = Scheduler::new(config()).unwrap();
        sched
            .register_action("initialize", "init", "init", counter(&setup), AttributeSet::empty())
            .unwrap();
        sched
            .register_action("advance", "push", "push", counter(&cycle), AttributeSet::empty())
            .unwrap();
        sched
            .register_action("finalize", "done", "done", counter(&teardown), AttributeSet::empty())
            .unwrap();

        let summary = sched.execute().unwrap();
        assert_eq!(setup.load(Ordering::SeqCst), 1);
        assert_eq!(cycle.load(Ordering::SeqCst), 3);
        assert_eq!(teardown.load(Ordering::SeqCst), 1);
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.actions_executed, 5);
        assert!(summary.is_success());
        assert_eq!(sched.state(), SchedulerState::Completed);
        assert!(matches!(sched.execute(), Err(StepError::Completed)));
    }

    #[test]
    fn step_limit_zero_runs_only_setup_and_teardown() {
        let cycle = Arc::new(AtomicUsize::new(0));
        let mut sched = Scheduler::new(config().with_step_limit(0)).unwrap();
        sched
            .register_action("advance", "push", "push", counter(&cycle), AttributeSet::empty())
            .unwrap();
        let summary = sched.execute().unwrap();
        assert_eq!(summary.steps, 0);
        assert_eq!(cycle.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn step_reports_metrics() {
        let mut sched = Scheduler::new(config()).unwrap();
        for id in ["b", "a"] {
            sched
                .register_action("advance", id, id, action_fn(|_| 0), AttributeSet::empty())
                .unwrap();
        }
        sched.init().unwrap();
        let metrics = sched.step().unwrap();
        assert_eq!(metrics.step, StepId(0));
        let phases: Vec<&str> = metrics.phase_us.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(phases, ["advance", "io"]);
        let actions: Vec<&str> = metrics.action_us.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(actions, ["a", "b"]);
        assert_eq!(metrics.failed_actions, 0);
        assert_eq!(sched.last_metrics(), &metrics);
        assert_eq!(sched.current_step(), StepId(1));
        assert_eq!(sched.state(), SchedulerState::Running);
    }

    #[test]
    fn actions_see_args_and_step() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut sched = Scheduler::new(config().with_args(["pic", "-n"])).unwrap();
        sched
            .register_action(
                "advance",
                "probe",
                "probe",
                action_fn(move |ctx| {
                    sink.lock().unwrap().push((ctx.argc(), ctx.step().0));
                    0
                }),
                AttributeSet::empty(),
            )
            .unwrap();
        sched.execute().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![(2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn attribute_query_selects_branch() {
        let half = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&half);
        let mut sched = Scheduler::new(config().with_step_limit(1)).unwrap();
        sched
            .register_action(
                "advance",
                "accumulate_currents",
                "currents",
                action_fn(|_| 0),
                AttributeSet::from_bits(0b0001),
            )
            .unwrap();
        sched
            .register_action(
                "advance",
                "update_fields",
                "fields",
                action_fn(move |ctx| {
                    if ctx.query_attribute("accumulate_currents", Attribute(0)) == Ok(true) {
                        flag.fetch_add(1, Ordering::SeqCst);
                    }
                    0
                }),
                AttributeSet::empty(),
            )
            .unwrap();
        sched
            .add_dependency("advance", "update_fields", "accumulate_currents")
            .unwrap();
        sched.execute().unwrap();
        assert_eq!(half.load(Ordering::SeqCst), 1);
        assert_eq!(
            sched.query_attribute("advance", "accumulate_currents", Attribute(0)),
            Ok(true)
        );
    }

    // ── Failure policy ─────────────────────────────────────────

    #[test]
    fn abort_run_stops_mid_phase() {
        let after = Arc::new(AtomicUsize::new(0));
        let hooked = Arc::new(AtomicUsize::new(0));
        let hook_count = Arc::clone(&hooked);
        let mut sched = Scheduler::new(config()).unwrap();
        sched
            .register_action("advance", "a_fail", "fail", action_fn(|_| 3), AttributeSet::empty())
            .unwrap();
        sched
            .register_action("advance", "b_after", "after", counter(&after), AttributeSet::empty())
            .unwrap();
        sched
            .register_action("io", "dump", "dump", counter(&after), AttributeSet::empty())
            .unwrap();
        sched.on_failure(move |_| {
            hook_count.fetch_add(1, Ordering::SeqCst);
        });

        match sched.execute() {
            Err(StepError::ActionFailed(failure)) => {
                assert_eq!(failure.phase.as_str(), "advance");
                assert_eq!(failure.action.as_str(), "a_fail");
                assert_eq!(failure.step, StepId(0));
                assert_eq!(failure.reason, ActionError::Status { code: 3 });
            }
            other => panic!("expected ActionFailed, got {other:?}"),
        }
        assert_eq!(after.load(Ordering::SeqCst), 0);
        assert_eq!(hooked.load(Ordering::SeqCst), 1);
        assert_eq!(sched.state(), SchedulerState::Completed);
        assert_eq!(sched.current_step(), StepId(0));
        assert_eq!(sched.last_metrics().failed_actions, 1);
        assert_eq!(sched.summary().exit_code(), 3);
    }

    #[test]
    fn zero_status_error_aborts_with_nonzero_exit() {
        let mut sched = Scheduler::new(config()).unwrap();
        sched
            .register_action(
                "io",
                "dump",
                "dump",
                cadence_graph::try_action_fn(|_| Err(ActionError::Status { code: 0 })),
                AttributeSet::empty(),
            )
            .unwrap();

        match sched.execute() {
            Err(StepError::ActionFailed(failure)) => assert_eq!(failure.exit_code(), 1),
            other => panic!("expected ActionFailed, got {other:?}"),
        }
        let summary = sched.summary();
        assert!(!summary.is_success());
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn abort_phase_continues_with_next_phase() {
        let after = Arc::new(AtomicUsize::new(0));
        let io = Arc::new(AtomicUsize::new(0));
        let hooked = Arc::new(AtomicUsize::new(0));
        let hook_count = Arc::clone(&hooked);
        let mut sched =
            Scheduler::new(config().with_failure_policy(FailurePolicy::AbortPhase)).unwrap();
        sched
            .register_action("advance", "a_fail", "fail", action_fn(|_| 2), AttributeSet::empty())
            .unwrap();
        sched
            .register_action("advance", "b_after", "after", counter(&after), AttributeSet::empty())
            .unwrap();
        sched
            .register_action("io", "dump", "dump", counter(&io), AttributeSet::empty())
            .unwrap();
        sched.on_failure(move |_| {
            hook_count.fetch_add(1, Ordering::SeqCst);
        });

        let summary = sched.execute().unwrap();
        assert_eq!(after.load(Ordering::SeqCst), 0);
        assert_eq!(io.load(Ordering::SeqCst), 3);
        assert_eq!(hooked.load(Ordering::SeqCst), 3);
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.failures.len(), 3);
        let steps: Vec<u64> = summary.failures.iter().map(|f| f.step.0).collect();
        assert_eq!(steps, [0, 1, 2]);
        assert_eq!(summary.exit_code(), 2);
        assert_eq!(sched.state(), SchedulerState::Completed);
    }

    #[test]
    fn execute_phase_moves_to_running() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut sched = Scheduler::new(config()).unwrap();
        sched
            .register_action("io", "dump", "dump", counter(&count), AttributeSet::empty())
            .unwrap();
        sched.init().unwrap();
        sched.execute_phase("io").unwrap();
        assert_eq!(sched.state(), SchedulerState::Running);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        sched.complete().unwrap();
        assert_eq!(sched.execute_phase("io"), Err(StepError::Completed));
    }
}
