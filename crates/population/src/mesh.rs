use cellspace_common::{NodeIndex, Vector};
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Boundary convention of the spatial domain nodes live in.
///
/// Displacements between two points depend on this: on a periodic domain the
/// shortest vector can cross the wrap boundary, so raw coordinate
/// subtraction is not safe in general.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain<const D: usize> {
    /// Open domain; displacement is plain subtraction.
    Unbounded,
    /// Periodic domain with the given axis widths; displacement is the
    /// minimum-image vector.
    Periodic { widths: Vector<D> },
}

/// The node set plus the geometric helpers every component consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMesh<const D: usize> {
    nodes: Vec<Node<D>>,
    domain: Domain<D>,
}

impl<const D: usize> NodeMesh<D> {
    pub fn new(domain: Domain<D>) -> Self {
        Self {
            nodes: Vec::new(),
            domain,
        }
    }

    /// Build a mesh from positions; node indices follow the input order.
    pub fn from_positions(
        positions: impl IntoIterator<Item = Vector<D>>,
        domain: Domain<D>,
    ) -> Self {
        let nodes = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Node::new(index, position))
            .collect();
        Self { nodes, domain }
    }

    pub fn domain(&self) -> &Domain<D> {
        &self.domain
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node<D>] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node<D>] {
        &mut self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> &Node<D> {
        &self.nodes[index]
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> &mut Node<D> {
        &mut self.nodes[index]
    }

    /// Append a node, returning its index.
    pub fn add_node(&mut self, position: Vector<D>) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new(index, position));
        index
    }

    /// Arithmetic mean of all node positions. Zero for an empty mesh.
    pub fn centroid(&self) -> Vector<D> {
        if self.nodes.is_empty() {
            return Vector::zeros();
        }
        let sum = self
            .nodes
            .iter()
            .fold(Vector::<D>::zeros(), |acc, node| acc + node.position());
        sum / self.nodes.len() as f64
    }

    /// Displacement from `from` to `to` under this mesh's boundary
    /// convention.
    pub fn displacement(&self, from: Vector<D>, to: Vector<D>) -> Vector<D> {
        let mut d = to - from;
        if let Domain::Periodic { widths } = &self.domain {
            for axis in 0..D {
                d[axis] -= widths[axis] * (d[axis] / widths[axis]).round();
            }
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> NodeMesh<2> {
        NodeMesh::from_positions(
            [
                Vector::<2>::new(1.0, 0.0),
                Vector::<2>::new(0.0, 1.0),
                Vector::<2>::new(-1.0, 0.0),
                Vector::<2>::new(0.0, -1.0),
            ],
            Domain::Unbounded,
        )
    }

    #[test]
    fn indices_follow_input_order() {
        let mesh = square();
        assert_eq!(mesh.num_nodes(), 4);
        for (expected, node) in mesh.nodes().iter().enumerate() {
            assert_eq!(node.index(), expected);
        }
    }

    #[test]
    fn centroid_is_mean_of_positions() {
        let mesh = square();
        assert_eq!(mesh.centroid(), Vector::<2>::zeros());

        let mut shifted = mesh;
        for node in shifted.nodes_mut() {
            *node.position_mut() += Vector::<2>::new(2.0, 3.0);
        }
        assert_eq!(shifted.centroid(), Vector::<2>::new(2.0, 3.0));
    }

    #[test]
    fn centroid_of_empty_mesh_is_zero() {
        let mesh = NodeMesh::<2>::new(Domain::Unbounded);
        assert_eq!(mesh.centroid(), Vector::<2>::zeros());
    }

    #[test]
    fn unbounded_displacement_is_subtraction() {
        let mesh = NodeMesh::<2>::new(Domain::Unbounded);
        let d = mesh.displacement(Vector::<2>::new(1.0, 2.0), Vector::<2>::new(4.0, 0.0));
        assert_eq!(d, Vector::<2>::new(3.0, -2.0));
    }

    #[test]
    fn periodic_displacement_takes_minimum_image() {
        let mesh = NodeMesh::<2>::new(Domain::Periodic {
            widths: Vector::<2>::new(10.0, 10.0),
        });
        // Crossing the wrap boundary: 9.5 -> 0.5 is a step of +1, not -9.
        let d = mesh.displacement(Vector::<2>::new(9.5, 0.0), Vector::<2>::new(0.5, 0.0));
        assert_eq!(d, Vector::<2>::new(1.0, 0.0));

        // Short displacements are unaffected.
        let d = mesh.displacement(Vector::<2>::new(4.0, 4.0), Vector::<2>::new(5.0, 3.0));
        assert_eq!(d, Vector::<2>::new(1.0, -1.0));
    }

    #[test]
    fn add_node_assigns_next_index() {
        let mut mesh = NodeMesh::<2>::new(Domain::Unbounded);
        assert_eq!(mesh.add_node(Vector::<2>::zeros()), 0);
        assert_eq!(mesh.add_node(Vector::<2>::new(1.0, 0.0)), 1);
        assert_eq!(mesh.node(1).position(), Vector::<2>::new(1.0, 0.0));
    }
}
