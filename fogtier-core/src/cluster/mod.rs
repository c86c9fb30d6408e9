//! Intra-layer clustering.
//!
//! A [`Clusterer`] turns the point set of one level into an ordered list of
//! [`Cluster`]s. The index of a cluster in that list is how the parent table
//! refers to it, so implementations must return a deterministic order.

mod agglomerative;

use std::num::NonZeroUsize;

use crate::{distance::DistanceMetric, geometry::Point};

pub use self::agglomerative::AgglomerativeClusterer;

/// Spatially grouped points belonging to a single level.
///
/// # Examples
/// ```
/// use fogtier_core::{Cluster, Point};
///
/// let cluster = Cluster::new(vec![Point::new(0.0, 0.0, 0.0)]);
/// assert_eq!(cluster.len(), 1);
/// assert!(!cluster.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cluster {
    points: Vec<Point>,
}

impl Cluster {
    /// Wraps `points` as a cluster.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Returns the member points in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the number of member points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for Cluster {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Ordered clusters of one level.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerClusters {
    level: usize,
    clusters: Vec<Cluster>,
}

impl LayerClusters {
    /// Creates the cluster set for the 1-based `level`.
    #[must_use]
    pub const fn new(level: usize, clusters: Vec<Cluster>) -> Self {
        Self { level, clusters }
    }

    /// Returns the 1-based level.
    #[rustfmt::skip]
    #[must_use]
    pub const fn level(&self) -> usize { self.level }

    /// Returns the clusters in index order.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Returns the cluster at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    /// Returns the number of clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns whether the level produced no clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Returns the total number of points across all clusters.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }
}

/// Stopping rule handed to a [`Clusterer`] for one level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClusterLimit {
    /// Members of a cluster may be at most this far apart.
    MaxDistance(f64),
    /// Merge until no more than this many clusters remain.
    TargetCount(NonZeroUsize),
}

/// Groups the points of one level into clusters.
///
/// # Examples
/// ```
/// use fogtier_core::{Cluster, ClusterLimit, Clusterer, DistanceMetric, Point};
///
/// /// Puts every point in its own cluster.
/// struct Singletons;
///
/// impl Clusterer for Singletons {
///     fn name(&self) -> &str { "singletons" }
///     fn cluster(
///         &self,
///         points: &[Point],
///         _limit: ClusterLimit,
///         _metric: &dyn DistanceMetric,
///     ) -> Vec<Cluster> {
///         points.iter().map(|p| Cluster::new(vec![*p])).collect()
///     }
/// }
///
/// let clusters = Singletons.cluster(
///     &[Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)],
///     ClusterLimit::MaxDistance(10.0),
///     &fogtier_core::Euclidean,
/// );
/// assert_eq!(clusters.len(), 2);
/// ```
pub trait Clusterer {
    /// Returns a human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Partitions `points` into clusters honouring `limit`.
    ///
    /// An empty input must produce an empty list.
    fn cluster(
        &self,
        points: &[Point],
        limit: ClusterLimit,
        metric: &dyn DistanceMetric,
    ) -> Vec<Cluster>;
}
