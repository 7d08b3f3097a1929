use cellspace_population::{Population, PopulationMismatch, VertexPopulation};
use serde::{Deserialize, Serialize};

use crate::{ModifierState, SimulationModifier};

/// Time between relaxation pulses, in simulation time units.
pub const PULSE_INTERVAL: f64 = 10.0;

/// Periodically nudges every node's first coordinate halfway toward the
/// population centroid's first coordinate.
///
/// This is a direct position mutation, not a force: it bypasses integration
/// and goes through the modifiable position entry point. The only state kept
/// across invocations is the time the pulse last fired; firing requires at
/// least [`PULSE_INTERVAL`] elapsed since then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidPulseModifier {
    last_fired: f64,
}

impl CentroidPulseModifier {
    /// Seeds the timer with the simulation start time, so the first pulse
    /// fires at `start_time + PULSE_INTERVAL`. Restoring a checkpointed
    /// `last_fired` value continues the original schedule.
    pub fn new(start_time: f64) -> Self {
        Self {
            last_fired: start_time,
        }
    }

    /// Time of the most recent firing, or the seed time if none yet.
    pub fn last_fired(&self) -> f64 {
        self.last_fired
    }
}

impl Default for CentroidPulseModifier {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<const D: usize> SimulationModifier<D> for CentroidPulseModifier {
    fn name(&self) -> &'static str {
        "CentroidPulseModifier"
    }

    fn setup(&mut self, _population: &mut dyn Population<D>) -> Result<(), PopulationMismatch> {
        // Reserved for seeding the timer from restored output state; must
        // stay side-effect-free until then.
        Ok(())
    }

    fn end_of_step(
        &mut self,
        population: &mut dyn Population<D>,
        now: f64,
    ) -> Result<(), PopulationMismatch> {
        let found = population.kind();
        let Some(vertex) = population.as_vertex_mut() else {
            return Err(PopulationMismatch {
                required: VertexPopulation::<D>::KIND,
                found,
            });
        };

        if now - self.last_fired < PULSE_INTERVAL {
            return Ok(());
        }
        self.last_fired = now;

        // The relaxation is only defined in the plane; the timer still
        // advances so the waiting/firing cadence is dimension-independent.
        if D != 2 {
            return Ok(());
        }

        let centroid = vertex.centroid();
        tracing::debug!(time = now, "centroid relaxation pulse");
        for index in 0..vertex.num_nodes() {
            let position = vertex.node_mut(index).position_mut();
            position[0] = 0.5 * (position[0] + centroid[0]);
        }
        Ok(())
    }

    fn state(&self) -> Option<ModifierState> {
        Some(ModifierState::CentroidPulse {
            last_fired: self.last_fired,
        })
    }
}
