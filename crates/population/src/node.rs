use cellspace_common::{NodeIndex, Vector};
use serde::{Deserialize, Serialize};

/// A point mass in the mechanical mesh.
///
/// Carries its stable index, its current position and the force accumulated
/// on it during the current timestep. The accumulator is reset once per
/// timestep by the driver, before any force law runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<const D: usize> {
    index: NodeIndex,
    position: Vector<D>,
    applied_force: Vector<D>,
}

impl<const D: usize> Node<D> {
    pub fn new(index: NodeIndex, position: Vector<D>) -> Self {
        Self {
            index,
            position,
            applied_force: Vector::zeros(),
        }
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn position(&self) -> Vector<D> {
        self.position
    }

    /// Direct mutable access to the position, bypassing force integration.
    ///
    /// This is the designated entry point for modifiers that correct
    /// geometry outside the force pipeline. Force laws must not use it.
    pub fn position_mut(&mut self) -> &mut Vector<D> {
        &mut self.position
    }

    pub fn applied_force(&self) -> Vector<D> {
        self.applied_force
    }

    /// Accumulate a force contribution.
    ///
    /// Contributions add; invoking a force law twice in one timestep
    /// double-counts.
    pub fn add_applied_force(&mut self, contribution: Vector<D>) {
        self.applied_force += contribution;
    }

    pub fn clear_applied_force(&mut self) {
        self.applied_force = Vector::zeros();
    }
}
