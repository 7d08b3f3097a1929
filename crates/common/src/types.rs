use nalgebra::SVector;

/// Stable index of a node within its mesh.
///
/// Node storage is index-ordered, so iterating `0..num_nodes` visits nodes
/// in a reproducible order regardless of how they were created.
pub type NodeIndex = usize;

/// A point or displacement in D-dimensional space.
///
/// D ranges over 1, 2 and 3. The planar case is the only one the shipped
/// components act in; the others reduce to designed no-ops.
pub type Vector<const D: usize> = SVector<f64, D>;
