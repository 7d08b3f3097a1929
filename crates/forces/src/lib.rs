//! Force laws: per-node mechanical contributions accumulated each timestep.
//!
//! # Invariants
//! - A force law only writes node force accumulators, never positions.
//! - All force laws run to completion before the driver's position sweep.
//! - Invocation is sequential, in registration order.

pub mod vortex;

pub use vortex::VortexForce;

use cellspace_common::ParameterReport;
use cellspace_population::{Population, PopulationMismatch};
use serde::{Deserialize, Serialize};

/// A force law's checkpointable configuration.
///
/// Serialized into checkpoints and rebuilt through [`restore_force`]; values
/// must survive a save/restore cycle bit-exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForceState {
    Vortex { strength_multiplier: f64 },
}

/// Rebuild a boxed force law from its checkpoint state.
pub fn restore_force<const D: usize>(state: &ForceState) -> Box<dyn ForceLaw<D>> {
    match state {
        ForceState::Vortex {
            strength_multiplier,
        } => Box::new(VortexForce::with_strength(*strength_multiplier)),
    }
}

/// Extension point for per-timestep force contributions.
///
/// The driver invokes [`ForceLaw::accumulate`] once per timestep, before
/// integrating positions. Implementations add into each node's accumulator;
/// invoking a force twice in one timestep double-counts by design.
pub trait ForceLaw<const D: usize> {
    /// Class name recorded in parameter reports and diagnostics.
    fn name(&self) -> &'static str;

    /// Add this law's contribution to every node's force accumulator.
    ///
    /// Fails with [`PopulationMismatch`] when the population representation
    /// does not expose what the law needs; the driver treats that as fatal.
    fn accumulate(&self, population: &mut dyn Population<D>) -> Result<(), PopulationMismatch>;

    /// Checkpointable state, if this law supports checkpointing.
    fn state(&self) -> Option<ForceState> {
        None
    }

    /// Emit this law's tunables to the report.
    ///
    /// Overrides record their own parameters first, then delegate to
    /// [`ForceLaw::report_base_parameters`] so the common entries are always
    /// present.
    fn report_parameters(&self, report: &mut ParameterReport) {
        self.report_base_parameters(report);
    }

    /// Common entries every force law records.
    fn report_base_parameters(&self, report: &mut ParameterReport) {
        report.record_text("force_class", self.name());
    }
}
