use crate::geometry::Point;

use super::DistanceMetric;

/// Straight-line distance across all three axes.
///
/// # Examples
/// ```
/// use fogtier_core::{DistanceMetric, Euclidean, Point};
///
/// let d = Euclidean.distance(&Point::new(0.0, 0.0, 0.0), &Point::new(2.0, 3.0, 6.0));
/// assert!((d - 7.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn name(&self) -> &str {
        "euclidean"
    }

    fn distance(&self, a: &Point, b: &Point) -> f64 {
        let dx = a.x() - b.x();
        let dy = a.y() - b.y();
        let da = a.altitude() - b.altitude();
        (dx * dx + dy * dy + da * da).sqrt()
    }
}
