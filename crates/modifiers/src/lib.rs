//! Simulation modifiers: direct geometric corrections applied outside the
//! force/integration pipeline, once at the end of every completed timestep.
//!
//! # Invariants
//! - Modifiers run after the driver's position sweep, in registration order.
//! - A modifier mutates geometry only through the designated modifiable
//!   position entry point, never through force accumulators.

pub mod centroid_pulse;

pub use centroid_pulse::{CentroidPulseModifier, PULSE_INTERVAL};

use cellspace_common::ParameterReport;
use cellspace_population::{Population, PopulationMismatch};
use serde::{Deserialize, Serialize};

/// A modifier's checkpointable state.
///
/// Serialized into checkpoints and rebuilt through [`restore_modifier`];
/// values must survive a save/restore cycle bit-exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModifierState {
    CentroidPulse { last_fired: f64 },
}

/// Rebuild a boxed modifier from its checkpoint state.
pub fn restore_modifier<const D: usize>(state: &ModifierState) -> Box<dyn SimulationModifier<D>> {
    match state {
        ModifierState::CentroidPulse { last_fired } => {
            Box::new(CentroidPulseModifier::new(*last_fired))
        }
    }
}

/// Extension point for per-timestep state mutations outside the force
/// pipeline.
pub trait SimulationModifier<const D: usize> {
    /// Class name recorded in parameter reports and diagnostics.
    fn name(&self) -> &'static str;

    /// One-time hook invoked before the first timestep.
    fn setup(&mut self, population: &mut dyn Population<D>) -> Result<(), PopulationMismatch> {
        let _ = population;
        Ok(())
    }

    /// Invoked once at the end of every completed timestep with the
    /// post-step simulation time.
    fn end_of_step(
        &mut self,
        population: &mut dyn Population<D>,
        now: f64,
    ) -> Result<(), PopulationMismatch>;

    /// Checkpointable state, if this modifier supports checkpointing.
    fn state(&self) -> Option<ModifierState> {
        None
    }

    /// Emit this modifier's tunables to the report.
    ///
    /// Overrides record their own parameters first, then delegate to
    /// [`SimulationModifier::report_base_parameters`] so the common entries
    /// are always present.
    fn report_parameters(&self, report: &mut ParameterReport) {
        self.report_base_parameters(report);
    }

    /// Common entries every modifier records.
    fn report_base_parameters(&self, report: &mut ParameterReport) {
        report.record_text("modifier_class", self.name());
    }
}
