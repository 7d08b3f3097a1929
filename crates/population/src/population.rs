use cellspace_common::{NodeIndex, Vector};
use serde::{Deserialize, Serialize};

use crate::mesh::{Domain, NodeMesh};
use crate::node::Node;

/// Raised when a component is attached to a population representation it
/// does not support.
///
/// Fatal by design: silently skipping would produce physically meaningless
/// results without warning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("component requires a {required} population, got {found}")]
pub struct PopulationMismatch {
    pub required: &'static str,
    pub found: &'static str,
}

/// Capability trait every population representation implements.
///
/// Components hold `&mut dyn Population` only during their invocation window
/// and never own the state. A component that needs node-level geometry
/// downcasts through [`Population::as_vertex_mut`] and fails with
/// [`PopulationMismatch`] when the representation cannot provide it.
pub trait Population<const D: usize> {
    /// Short name of the representation, used in mismatch errors.
    fn kind(&self) -> &'static str;

    fn num_nodes(&self) -> usize;

    /// Aggregate centroid of all node positions.
    fn centroid(&self) -> Vector<D>;

    /// Boundary-aware displacement between two points.
    fn displacement(&self, from: Vector<D>, to: Vector<D>) -> Vector<D>;

    /// Reset every node's force accumulator. Called by the driver once per
    /// timestep, before any force law runs.
    fn clear_applied_forces(&mut self);

    /// Move every node by `scale` times its accumulated force. This is the
    /// driver's position sweep; nothing else moves nodes from forces.
    fn apply_accumulated_forces(&mut self, scale: f64);

    fn as_vertex(&self) -> Option<&VertexPopulation<D>> {
        None
    }

    fn as_vertex_mut(&mut self) -> Option<&mut VertexPopulation<D>> {
        None
    }
}

/// The node/vertex-based population: individually mutable nodes plus the
/// mesh displacement helper. The only representation the shipped force laws
/// and modifiers support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexPopulation<const D: usize> {
    mesh: NodeMesh<D>,
}

impl<const D: usize> VertexPopulation<D> {
    pub const KIND: &'static str = "vertex";

    pub fn new(mesh: NodeMesh<D>) -> Self {
        Self { mesh }
    }

    pub fn from_positions(
        positions: impl IntoIterator<Item = Vector<D>>,
        domain: Domain<D>,
    ) -> Self {
        Self::new(NodeMesh::from_positions(positions, domain))
    }

    pub fn mesh(&self) -> &NodeMesh<D> {
        &self.mesh
    }

    pub fn node(&self, index: NodeIndex) -> &Node<D> {
        self.mesh.node(index)
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> &mut Node<D> {
        self.mesh.node_mut(index)
    }

    /// FNV-1a over the exact bit patterns of every position and accumulator.
    ///
    /// Bit-identical states hash identically, which is what checkpoint
    /// round-trip tests compare.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for node in self.mesh.nodes() {
            for axis in 0..D {
                mix(&mut h, &node.position()[axis].to_le_bytes());
                mix(&mut h, &node.applied_force()[axis].to_le_bytes());
            }
        }
        h
    }
}

impl<const D: usize> Population<D> for VertexPopulation<D> {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn num_nodes(&self) -> usize {
        self.mesh.num_nodes()
    }

    fn centroid(&self) -> Vector<D> {
        self.mesh.centroid()
    }

    fn displacement(&self, from: Vector<D>, to: Vector<D>) -> Vector<D> {
        self.mesh.displacement(from, to)
    }

    fn clear_applied_forces(&mut self) {
        for node in self.mesh.nodes_mut() {
            node.clear_applied_force();
        }
    }

    fn apply_accumulated_forces(&mut self, scale: f64) {
        for node in self.mesh.nodes_mut() {
            let step = node.applied_force() * scale;
            *node.position_mut() += step;
        }
    }

    fn as_vertex(&self) -> Option<&VertexPopulation<D>> {
        Some(self)
    }

    fn as_vertex_mut(&mut self) -> Option<&mut VertexPopulation<D>> {
        Some(self)
    }
}
