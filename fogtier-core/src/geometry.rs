//! Spatial primitives shared by every planning stage.

use serde::{Deserialize, Serialize};

/// A position in simulation space.
///
/// # Examples
/// ```
/// use fogtier_core::Point;
///
/// let point = Point::new(10.0, 20.0, 3.5);
/// assert_eq!(point.x(), 10.0);
/// assert_eq!(point.altitude(), 3.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
    altitude: f64,
}

impl Point {
    /// Creates a point from its three coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, altitude: f64) -> Self {
        Self { x, y, altitude }
    }

    /// Returns the x coordinate.
    #[rustfmt::skip]
    #[must_use]
    pub const fn x(&self) -> f64 { self.x }

    /// Returns the y coordinate.
    #[rustfmt::skip]
    #[must_use]
    pub const fn y(&self) -> f64 { self.y }

    /// Returns the altitude.
    #[rustfmt::skip]
    #[must_use]
    pub const fn altitude(&self) -> f64 { self.altitude }

    /// Returns whether every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.altitude.is_finite()
    }
}

/// A located node tagged with the 1-based level it serves.
///
/// Nodes deserialise from a flat record so simulation exports can be fed in
/// directly:
///
/// ```
/// use fogtier_core::Node;
///
/// let node: Node = serde_json::from_str(r#"{"x":1.0,"y":2.0,"altitude":0.0,"level":3}"#)?;
/// assert_eq!(node.level(), 3);
/// assert_eq!(node.point().y(), 2.0);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    point: Point,
    level: usize,
}

impl Node {
    /// Creates a node at `point` on `level`.
    #[must_use]
    pub const fn new(point: Point, level: usize) -> Self {
        Self { point, level }
    }

    /// Returns the node position.
    #[rustfmt::skip]
    #[must_use]
    pub const fn point(&self) -> Point { self.point }

    /// Returns the 1-based level assigned upstream.
    #[rustfmt::skip]
    #[must_use]
    pub const fn level(&self) -> usize { self.level }
}
