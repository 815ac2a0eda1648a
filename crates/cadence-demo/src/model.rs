//! The particle-in-cell control model.
//!
//! Actions only log what they would do. `update_fields` picks its
//! branch from the attributes `accumulate_currents` was registered with.

use cadence::prelude::*;
use cadence::types::AttributeError;
use cadence_test_utils::pic::{PicAttribute, ADVANCE, ANALYZE, FINALIZE, INITIALIZE, IO, MESH};

pub fn config(steps: u64, policy: FailurePolicy, args: Vec<String>) -> SchedulerConfig {
    SchedulerConfig::new([ADVANCE, ANALYZE, IO, MESH])
        .with_setup([INITIALIZE])
        .with_teardown([FINALIZE])
        .with_step_limit(steps)
        .with_failure_policy(policy)
        .with_args(args)
}

fn say(message: &'static str) -> impl Action {
    action_fn(move |ctx| {
        tracing::info!(phase = %ctx.phase(), step = ctx.step().0, "{message}");
        0
    })
}

fn update_fields() -> impl Action {
    action_fn(|ctx| {
        let flag = PicAttribute::TimeAdvanceHalf;
        match ctx.query_attribute("accumulate_currents", flag) {
            Ok(true) => {
                tracing::info!(step = ctx.step().0, flag = flag.label(), "update fields: half step")
            }
            Ok(false) => tracing::info!(step = ctx.step().0, "update fields: whole step"),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    flag = flag.label(),
                    "update fields: cannot read peer attributes"
                );
                return 1;
            }
        }
        0
    })
}

fn restart_dump(fail_step: Option<u64>) -> impl Action {
    try_action_fn(move |ctx| {
        if fail_step == Some(ctx.step().0) {
            return Err(ActionError::Failed {
                reason: format!("cannot write restart file at step {}", ctx.step()),
            });
        }
        tracing::info!(step = ctx.step().0, "restart dump");
        Ok(())
    })
}

/// Registration steps for the whole model.
///
/// `fail_step` makes `restart_dump` fail at that step.
pub fn registrations(fail_step: Option<u64>) -> Result<Registrations, AttributeError> {
    let whole = AttributeSet::from_flags([PicAttribute::TimeAdvanceWhole])?;
    let half = AttributeSet::from_flags([PicAttribute::TimeAdvanceHalf])?;
    let eos = AttributeSet::from_flags([PicAttribute::UpdatedEosAtFaces])?;
    let none = AttributeSet::empty();

    Ok(Registrations::new()
        .with(INITIALIZE, move |reg| {
            for (id, name, message) in [
                ("init_mesh", "initialize mesh", "init mesh"),
                ("init_fields", "initialize fields", "init fields"),
                ("init_species", "initialize species", "init species"),
            ] {
                reg.register_action(INITIALIZE, id, name, say(message), none)?;
            }
            reg.add_dependency(INITIALIZE, "init_fields", "init_mesh")?;
            reg.add_dependency(INITIALIZE, "init_species", "init_mesh")
        })
        .with(ADVANCE, move |reg| {
            reg.register_action(
                ADVANCE,
                "advance_particles",
                "advance particles",
                say("advance particles"),
                whole,
            )?;
            reg.register_action(
                ADVANCE,
                "accumulate_currents",
                "accumulate currents",
                say("accumulate currents"),
                half,
            )?;
            reg.register_action(ADVANCE, "update_fields", "update fields", update_fields(), eos)?;
            reg.add_dependency(ADVANCE, "accumulate_currents", "advance_particles")?;
            reg.add_dependency(ADVANCE, "update_fields", "accumulate_currents")
        })
        .with(ANALYZE, move |reg| {
            let flux = say("poynting flux");
            reg.register_action(ANALYZE, "poynting_flux", "poynting flux", flux, none)
        })
        .with(IO, move |reg| {
            reg.register_action(
                IO,
                "restart_dump",
                "restart dump",
                restart_dump(fail_step),
                none,
            )?;
            reg.register_action(IO, "write_flux", "write flux", say("write flux"), none)
        })
        .with(MESH, move |reg| {
            reg.register_action(MESH, "fixup_mesh", "fixup mesh", say("fixup mesh"), none)
        })
        .with(FINALIZE, move |reg| {
            reg.register_action(FINALIZE, "finalize", "finalize", say("finalize"), none)
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrations_carry_pic_attributes() {
        let config = config(2, FailurePolicy::AbortRun, Vec::new());
        let mut sched = Scheduler::new(config).unwrap();
        sched.apply(registrations(None).unwrap()).unwrap();
        sched.init().unwrap();

        let advance = |action, flag| sched.query_attribute(ADVANCE, action, flag).unwrap();
        assert!(advance("accumulate_currents", PicAttribute::TimeAdvanceHalf));
        assert!(!advance("accumulate_currents", PicAttribute::TimeAdvanceWhole));
        assert!(advance("advance_particles", PicAttribute::TimeAdvanceWhole));
        assert!(advance("update_fields", PicAttribute::UpdatedEosAtFaces));
        assert_eq!(sched.registry().action_count(), 11);
        assert_eq!(PicAttribute::TimeAdvanceHalf.label(), "time_advance_half");
    }

    #[test]
    fn restart_dump_failure_sets_exit_code() {
        let config = config(3, FailurePolicy::AbortRun, Vec::new());
        let mut sched = Scheduler::new(config).unwrap();
        sched.apply(registrations(Some(1)).unwrap()).unwrap();
        match sched.execute() {
            Err(StepError::ActionFailed(failure)) => {
                assert_eq!(failure.action.as_str(), "restart_dump");
                assert_eq!(failure.step, StepId(1));
                assert_eq!(failure.exit_code(), 1);
            }
            other => panic!("expected ActionFailed, got {other:?}"),
        }
    }
}
