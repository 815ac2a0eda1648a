//! The particle-in-cell control model used as a shared fixture.
//!
//! Setup phase `initialize`, cycle `advance → analyze → io → mesh`,
//! teardown phase `finalize`. [`register`] uses a [`RecordingAction`]
//! for every action; [`register_with`] takes any action factory.

use cadence_core::{AttributeFlag, AttributeSet, GraphError};
use cadence_graph::{Action, PhaseRegistry, PhaseSchedule};

use crate::{RecordingAction, TraceLog};

/// Attribute flags of the particle-in-cell model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PicAttribute {
    TimeAdvanceHalf = 0,
    TimeAdvanceWhole = 1,
    UpdatedEosAtFaces = 2,
}

impl AttributeFlag for PicAttribute {
    fn bit(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Self::TimeAdvanceHalf => "time_advance_half",
            Self::TimeAdvanceWhole => "time_advance_whole",
            Self::UpdatedEosAtFaces => "updated_eos_at_faces",
        }
    }
}

pub const INITIALIZE: &str = "initialize";
pub const ADVANCE: &str = "advance";
pub const ANALYZE: &str = "analyze";
pub const IO: &str = "io";
pub const MESH: &str = "mesh";
pub const FINALIZE: &str = "finalize";

/// `(phase, action, attribute bits)` for every action in the model.
pub const ACTIONS: &[(&str, &str, u64)] = &[
    (INITIALIZE, "init_mesh", 0),
    (INITIALIZE, "init_fields", 0),
    (INITIALIZE, "init_species", 0),
    (ADVANCE, "advance_particles", 0),
    (ADVANCE, "accumulate_currents", 1 << PicAttribute::TimeAdvanceHalf as u8),
    (ADVANCE, "update_fields", 0),
    (ANALYZE, "poynting_flux", 0),
    (IO, "restart_dump", 0),
    (IO, "write_flux", 0),
    (MESH, "fixup_mesh", 0),
    (FINALIZE, "finalize", 0),
];

/// `(phase, dependent, dependency)` for every edge in the model.
pub const DEPENDENCIES: &[(&str, &str, &str)] = &[
    (INITIALIZE, "init_fields", "init_mesh"),
    (INITIALIZE, "init_species", "init_mesh"),
    (ADVANCE, "accumulate_currents", "advance_particles"),
    (ADVANCE, "update_fields", "accumulate_currents"),
];

/// The model's phase schedule.
pub fn schedule() -> PhaseSchedule {
    PhaseSchedule::new([ADVANCE, ANALYZE, IO, MESH])
        .with_setup([INITIALIZE])
        .with_teardown([FINALIZE])
}

/// Register every action and dependency, recording into `log`.
pub fn register(registry: &mut PhaseRegistry, log: &TraceLog) -> Result<(), GraphError> {
    register_with(registry, || RecordingAction::new(log))
}

/// Register the model with actions built by `make`.
pub fn register_with<A, F>(registry: &mut PhaseRegistry, mut make: F) -> Result<(), GraphError>
where
    A: Action,
    F: FnMut() -> A,
{
    for &(phase, id, bits) in ACTIONS {
        registry.register_action(
            phase,
            id,
            id.replace('_', " "),
            make(),
            AttributeSet::from_bits(bits),
        )?;
    }
    for &(phase, dependent, dependency) in DEPENDENCIES {
        registry.add_dependency(phase, dependent, dependency)?;
    }
    Ok(())
}
