//! Complete-link agglomerative clustering.
//!
//! Every point starts as a singleton. The closest pair of clusters, measured
//! by the largest distance between their members, is merged until the
//! [`ClusterLimit`] is reached. Ties go to the first pair in row-major order
//! and surviving clusters keep their relative order, so the output is fully
//! determined by the input order.

use tracing::debug;

use crate::{distance::DistanceMetric, geometry::Point};

use super::{Cluster, ClusterLimit, Clusterer};

/// Complete-link agglomerative clusterer supporting both distance and count
/// limits.
///
/// # Examples
/// ```
/// use fogtier_core::{AgglomerativeClusterer, ClusterLimit, Clusterer, Euclidean, Point};
///
/// let points = [
///     Point::new(0.0, 0.0, 0.0),
///     Point::new(1.0, 0.0, 0.0),
///     Point::new(100.0, 0.0, 0.0),
/// ];
/// let clusters = AgglomerativeClusterer.cluster(&points, ClusterLimit::MaxDistance(5.0), &Euclidean);
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0].len(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AgglomerativeClusterer;

impl Clusterer for AgglomerativeClusterer {
    fn name(&self) -> &str {
        "agglomerative-complete-link"
    }

    fn cluster(
        &self,
        points: &[Point],
        limit: ClusterLimit,
        metric: &dyn DistanceMetric,
    ) -> Vec<Cluster> {
        if points.is_empty() {
            return Vec::new();
        }

        let mut state = MergeState::new(points, metric);
        let mut merges = 0usize;
        while let Some((left, right, distance)) = state.closest_pair() {
            let stop = match limit {
                ClusterLimit::MaxDistance(max) => distance > max,
                ClusterLimit::TargetCount(target) => state.alive.len() <= target.get(),
            };
            if stop {
                break;
            }
            state.merge(left, right);
            merges += 1;
        }

        debug!(
            points = points.len(),
            merges,
            clusters = state.alive.len(),
            "agglomerative clustering finished"
        );
        state.into_clusters()
    }
}

struct MergeState {
    groups: Vec<Vec<Point>>,
    // Complete-link distances between the groups, indexed by group id.
    distances: Vec<Vec<f64>>,
    // Ids of groups that have not been merged away, in output order.
    alive: Vec<usize>,
}

impl MergeState {
    fn new(points: &[Point], metric: &dyn DistanceMetric) -> Self {
        let distances = points
            .iter()
            .map(|a| points.iter().map(|b| metric.distance(a, b)).collect())
            .collect();
        Self {
            groups: points.iter().map(|point| vec![*point]).collect(),
            distances,
            alive: (0..points.len()).collect(),
        }
    }

    /// Returns positions in `alive` of the closest pair and their distance.
    fn closest_pair(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (left_pos, &left) in self.alive.iter().enumerate() {
            for (offset, &right) in self.alive.iter().skip(left_pos + 1).enumerate() {
                let distance = self.distances[left][right];
                if distance.is_nan() {
                    continue;
                }
                if best.is_none_or(|(_, _, current)| distance < current) {
                    best = Some((left_pos, left_pos + 1 + offset, distance));
                }
            }
        }
        best
    }

    fn merge(&mut self, left_pos: usize, right_pos: usize) {
        let left = self.alive[left_pos];
        let right = self.alive.remove(right_pos);
        let absorbed = std::mem::take(&mut self.groups[right]);
        self.groups[left].extend(absorbed);

        for &other in &self.alive {
            if other == left {
                continue;
            }
            let merged = farthest(self.distances[left][other], self.distances[right][other]);
            self.distances[left][other] = merged;
            self.distances[other][left] = merged;
        }
    }

    fn into_clusters(mut self) -> Vec<Cluster> {
        self.alive
            .iter()
            .map(|&id| Cluster::new(std::mem::take(&mut self.groups[id])))
            .collect()
    }
}

// Unlike `f64::max`, keeps a NaN so an unmeasurable pair stays unmergeable.
fn farthest(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
