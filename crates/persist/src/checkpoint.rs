use cellspace_forces::{ForceLaw, ForceState, restore_force};
use cellspace_kernel::{Simulation, SimulationClock, SimulationConfig};
use cellspace_modifiers::{ModifierState, SimulationModifier, restore_modifier};
use cellspace_population::{NodeMesh, Population, VertexPopulation};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from checkpoint capture, restore and codec operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CBOR encode error: {0}")]
    Encode(String),
    #[error("CBOR decode error: {0}")]
    Decode(String),
    #[error("cannot checkpoint a {kind} population")]
    UnsupportedPopulation { kind: &'static str },
    #[error("component {name} does not support checkpointing")]
    UnsupportedComponent { name: &'static str },
    #[error("integrity check failed")]
    IntegrityMismatch,
}

/// A complete, restorable snapshot of a running simulation.
///
/// Captures the mesh, the clock, the driver configuration and every
/// component's scalar state. A restored run must be bit-identical to an
/// uninterrupted one; `VertexPopulation::state_hash` is the yardstick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint<const D: usize> {
    pub clock: SimulationClock,
    pub config: SimulationConfig,
    pub mesh: NodeMesh<D>,
    pub forces: Vec<ForceState>,
    pub modifiers: Vec<ModifierState>,
    /// Content hash over the serialized payload, for corruption detection.
    pub hash: u64,
}

impl<const D: usize> Checkpoint<D> {
    /// Snapshot the current state of a simulation.
    ///
    /// Requires a vertex population and components that expose checkpoint
    /// state; anything else fails rather than capturing a partial snapshot.
    pub fn capture(sim: &Simulation<D>) -> Result<Self, CheckpointError> {
        let Some(vertex) = sim.population().as_vertex() else {
            return Err(CheckpointError::UnsupportedPopulation {
                kind: sim.population().kind(),
            });
        };

        let forces = sim
            .forces()
            .iter()
            .map(|force| {
                force
                    .state()
                    .ok_or(CheckpointError::UnsupportedComponent { name: force.name() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let modifiers = sim
            .modifiers()
            .iter()
            .map(|modifier| {
                modifier
                    .state()
                    .ok_or(CheckpointError::UnsupportedComponent {
                        name: modifier.name(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut checkpoint = Self {
            clock: sim.clock(),
            config: sim.config(),
            mesh: vertex.mesh().clone(),
            forces,
            modifiers,
            hash: 0,
        };
        checkpoint.hash = checkpoint.content_hash()?;
        Ok(checkpoint)
    }

    /// Verify the content hash. False means the checkpoint was tampered
    /// with or corrupted.
    pub fn verify(&self) -> bool {
        self.content_hash().map(|h| h == self.hash).unwrap_or(false)
    }

    /// Rebuild a driver ready to continue from the captured time.
    pub fn restore(&self) -> Simulation<D> {
        let population = Box::new(VertexPopulation::new(self.mesh.clone()));
        let forces = self
            .forces
            .iter()
            .map(|state| restore_force::<D>(state))
            .collect();
        let modifiers = self
            .modifiers
            .iter()
            .map(|state| restore_modifier::<D>(state))
            .collect();
        Simulation::from_parts(population, forces, modifiers, self.clock, self.config)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        cbor_to_vec(self)
    }

    /// Decode and verify. Fails closed on any corruption.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self =
            ciborium::from_reader(bytes).map_err(|e| CheckpointError::Decode(e.to_string()))?;
        if !checkpoint.verify() {
            return Err(CheckpointError::IntegrityMismatch);
        }
        Ok(checkpoint)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    /// Hash of the CBOR payload with the hash field zeroed.
    fn content_hash(&self) -> Result<u64, CheckpointError> {
        let mut unhashed = self.clone();
        unhashed.hash = 0;
        Ok(fnv1a(&cbor_to_vec(&unhashed)?))
    }
}

fn cbor_to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, CheckpointError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CheckpointError::Encode(e.to_string()))?;
    Ok(buf)
}

/// FNV-1a over the serialized payload. Sufficient for corruption detection.
fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellspace_common::Vector;
    use cellspace_forces::{ForceLaw, VortexForce};
    use cellspace_modifiers::CentroidPulseModifier;
    use cellspace_population::{Domain, Population, PopulationMismatch};

    fn vortex_sim() -> Simulation<2> {
        let population = Box::new(VertexPopulation::from_positions(
            [
                Vector::<2>::new(1.0, 0.0),
                Vector::<2>::new(0.0, 1.0),
                Vector::<2>::new(-1.0, 0.0),
                Vector::<2>::new(0.0, -1.0),
            ],
            Domain::Unbounded,
        ));
        let mut sim = Simulation::new(
            population,
            SimulationConfig {
                dt: 1.0,
                damping: 1.0,
            },
        );
        sim.add_force(Box::new(VortexForce::with_strength(0.15)));
        sim.add_modifier(Box::new(CentroidPulseModifier::default()));
        sim
    }

    fn population_hash(sim: &Simulation<2>) -> u64 {
        sim.population().as_vertex().unwrap().state_hash()
    }

    #[test]
    fn capture_preserves_component_state_exactly() {
        let mut sim = vortex_sim();
        sim.run_to(7.0).unwrap();

        let checkpoint = Checkpoint::capture(&sim).unwrap();
        assert_eq!(checkpoint.clock.now(), 7.0);
        assert_eq!(
            checkpoint.forces,
            vec![ForceState::Vortex {
                strength_multiplier: 0.15
            }]
        );
        assert_eq!(
            checkpoint.modifiers,
            vec![ModifierState::CentroidPulse { last_fired: 0.0 }]
        );
        assert!(checkpoint.verify());
    }

    #[test]
    fn resumed_run_is_bit_identical_to_uninterrupted() {
        let mut uninterrupted = vortex_sim();
        uninterrupted.run_to(13.0).unwrap();
        let checkpoint = Checkpoint::capture(&uninterrupted).unwrap();
        uninterrupted.run_to(30.0).unwrap();

        let mut resumed = checkpoint.restore();
        assert_eq!(resumed.now(), 13.0);
        resumed.run_to(30.0).unwrap();

        assert_eq!(resumed.now(), uninterrupted.now());
        assert_eq!(population_hash(&resumed), population_hash(&uninterrupted));
    }

    #[test]
    fn byte_codec_round_trips() {
        let mut sim = vortex_sim();
        sim.run_to(11.0).unwrap();

        let checkpoint = Checkpoint::capture(&sim).unwrap();
        let bytes = checkpoint.to_bytes().unwrap();
        let decoded = Checkpoint::<2>::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.clock, checkpoint.clock);
        assert_eq!(decoded.forces, checkpoint.forces);
        assert_eq!(decoded.modifiers, checkpoint.modifiers);
        assert_eq!(decoded.mesh, checkpoint.mesh);
        assert_eq!(decoded.hash, checkpoint.hash);
    }

    #[test]
    fn corruption_fails_closed() {
        let sim = vortex_sim();
        let checkpoint = Checkpoint::capture(&sim).unwrap();

        let mut bytes = checkpoint.to_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;

        assert!(Checkpoint::<2>::from_bytes(&bytes).is_err());

        let mut tampered = checkpoint;
        tampered.config.dt = 999.0;
        assert!(!tampered.verify());
    }

    #[test]
    fn file_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.checkpoint.cbor");

        let mut sim = vortex_sim();
        sim.run_to(5.0).unwrap();
        let checkpoint = Checkpoint::capture(&sim).unwrap();
        checkpoint.save(&path).unwrap();

        let loaded = Checkpoint::<2>::load(&path).unwrap();
        assert!(loaded.verify());

        let mut resumed = loaded.restore();
        sim.run_to(10.0).unwrap();
        resumed.run_to(10.0).unwrap();
        assert_eq!(population_hash(&resumed), population_hash(&sim));
    }

    #[test]
    fn pulse_schedule_survives_restore() {
        let mut sim = vortex_sim();
        sim.run_to(10.0).unwrap();

        let checkpoint = Checkpoint::capture(&sim).unwrap();
        assert_eq!(
            checkpoint.modifiers,
            vec![ModifierState::CentroidPulse { last_fired: 10.0 }]
        );

        // The restored pulse must not refire before t = 20.
        let mut resumed = checkpoint.restore();
        resumed.run_to(19.0).unwrap();
        let hash_at_19 = population_hash(&resumed);
        sim.run_to(19.0).unwrap();
        assert_eq!(hash_at_19, population_hash(&sim));
    }

    #[test]
    fn components_without_state_cannot_be_checkpointed() {
        struct ProbeForce;

        impl ForceLaw<2> for ProbeForce {
            fn name(&self) -> &'static str {
                "ProbeForce"
            }
            fn accumulate(
                &self,
                _population: &mut dyn Population<2>,
            ) -> Result<(), PopulationMismatch> {
                Ok(())
            }
        }

        let mut sim = vortex_sim();
        sim.add_force(Box::new(ProbeForce));

        match Checkpoint::capture(&sim) {
            Err(CheckpointError::UnsupportedComponent { name }) => {
                assert_eq!(name, "ProbeForce");
            }
            other => panic!("expected UnsupportedComponent, got {other:?}"),
        }
    }
}
