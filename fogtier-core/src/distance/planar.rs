use crate::geometry::Point;

use super::DistanceMetric;

/// Ground-plane distance that ignores altitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Planar;

impl DistanceMetric for Planar {
    fn name(&self) -> &str {
        "planar"
    }

    fn distance(&self, a: &Point, b: &Point) -> f64 {
        (a.x() - b.x()).hypot(a.y() - b.y())
    }
}
