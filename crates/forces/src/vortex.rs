use cellspace_common::{ParameterReport, Vector};
use cellspace_population::{Population, PopulationMismatch, VertexPopulation};
use serde::{Deserialize, Serialize};

use crate::{ForceLaw, ForceState};

/// Tangential force circulating counter-clockwise around the population
/// centroid, with magnitude proportional to the distance from it.
///
/// The rotation is only defined in the plane; in one or three dimensions the
/// contribution is the zero vector by design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VortexForce {
    strength_multiplier: f64,
}

impl VortexForce {
    pub fn new() -> Self {
        Self {
            strength_multiplier: 1.0,
        }
    }

    pub fn with_strength(strength_multiplier: f64) -> Self {
        Self {
            strength_multiplier,
        }
    }

    pub fn strength_multiplier(&self) -> f64 {
        self.strength_multiplier
    }

    /// No bounds are enforced; a negative value reverses the circulation.
    pub fn set_strength_multiplier(&mut self, strength_multiplier: f64) {
        self.strength_multiplier = strength_multiplier;
    }
}

impl Default for VortexForce {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> ForceLaw<D> for VortexForce {
    fn name(&self) -> &'static str {
        "VortexForce"
    }

    fn accumulate(&self, population: &mut dyn Population<D>) -> Result<(), PopulationMismatch> {
        let found = population.kind();
        let Some(vertex) = population.as_vertex_mut() else {
            return Err(PopulationMismatch {
                required: VertexPopulation::<D>::KIND,
                found,
            });
        };

        // The rotation is only defined in the plane; elsewhere every
        // contribution is zero and the accumulators stay untouched.
        if D != 2 {
            return Ok(());
        }

        let centroid = vertex.centroid();
        for index in 0..vertex.num_nodes() {
            let from_centroid = vertex.displacement(centroid, vertex.node(index).position());

            let mut contribution = Vector::<D>::zeros();
            contribution[0] = -from_centroid[1];
            contribution[1] = from_centroid[0];

            vertex
                .node_mut(index)
                .add_applied_force(contribution * self.strength_multiplier);
        }
        tracing::trace!(
            nodes = vertex.num_nodes(),
            strength = self.strength_multiplier,
            "vortex force accumulated"
        );
        Ok(())
    }

    fn state(&self) -> Option<ForceState> {
        Some(ForceState::Vortex {
            strength_multiplier: self.strength_multiplier,
        })
    }

    fn report_parameters(&self, report: &mut ParameterReport) {
        report.record_scalar("strength_multiplier", self.strength_multiplier);
        <VortexForce as ForceLaw<D>>::report_base_parameters(self, report);
    }
}
