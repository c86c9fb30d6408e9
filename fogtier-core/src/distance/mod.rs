//! Distance metrics between located points.
//!
//! The linker and the built-in clusterer only rely on symmetry and
//! non-negativity; the triangle inequality is never assumed. A NaN distance
//! marks the pair as unmeasurable: it never wins a parent slot and never
//! drives a merge.

mod euclidean;
mod planar;

use crate::geometry::Point;

pub use self::euclidean::Euclidean;
pub use self::planar::Planar;

/// A symmetric, non-negative distance between two points.
///
/// Implementations should return finite values. NaN is tolerated but makes
/// every cluster pair containing the two points unmeasurable.
///
/// # Examples
/// ```
/// use fogtier_core::{DistanceMetric, Point};
///
/// struct Manhattan;
///
/// impl DistanceMetric for Manhattan {
///     fn name(&self) -> &str { "manhattan" }
///     fn distance(&self, a: &Point, b: &Point) -> f64 {
///         (a.x() - b.x()).abs() + (a.y() - b.y()).abs() + (a.altitude() - b.altitude()).abs()
///     }
/// }
///
/// let d = Manhattan.distance(&Point::new(0.0, 0.0, 0.0), &Point::new(1.0, 2.0, 3.0));
/// assert_eq!(d, 6.0);
/// ```
pub trait DistanceMetric: Send + Sync {
    /// Returns a human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Computes the distance between `a` and `b`.
    fn distance(&self, a: &Point, b: &Point) -> f64;
}

impl<M: DistanceMetric + ?Sized> DistanceMetric for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn distance(&self, a: &Point, b: &Point) -> f64 {
        (**self).distance(a, b)
    }
}
