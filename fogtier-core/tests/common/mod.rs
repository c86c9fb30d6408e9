use fogtier_core::{Node, Point};
use fogtier_test_support::layout::Coordinates;

/// Tags every coordinate triple with `level`.
#[must_use]
pub fn nodes_at(level: usize, coordinates: &[Coordinates]) -> Vec<Node> {
    coordinates
        .iter()
        .map(|&[x, y, altitude]| Node::new(Point::new(x, y, altitude), level))
        .collect()
}

/// A single node on the x axis.
#[must_use]
pub fn node(x: f64, level: usize) -> Node {
    Node::new(Point::new(x, 0.0, 0.0), level)
}
