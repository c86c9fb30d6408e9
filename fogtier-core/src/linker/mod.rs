//! Inter-layer parent assignment.
//!
//! Every cluster in a lower level is linked to the cluster in the next level
//! up with the smallest complete-link distance, the largest distance between
//! any member of the lower cluster and any member of the candidate. The
//! measure is conservative: a parent only wins when even the farthest pair of
//! members is close.
//!
//! Level pairs are processed from the top down. The root level is always
//! pinned to [`ParentLink::Root`] and, unless disabled, the level beneath it is
//! pinned to a single [`ParentLink::Cluster`]`(0)` entry regardless of
//! geometry. Each lower cluster is an independent max-then-min reduction, so
//! the `parallel` feature spreads them over a rayon pool without changing the
//! result.

use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    Result,
    cluster::{Cluster, LayerClusters},
    distance::DistanceMetric,
    error::HierarchyError,
    hierarchy::{ParentLink, ParentTable},
    planner::ExecutionStrategy,
};

/// Computes the complete-link distance between two clusters.
///
/// Returns `None` when either cluster has no points, because the maximum over
/// an empty set of pairs is undefined, or when the metric yields NaN for any
/// pair.
///
/// # Examples
/// ```
/// use fogtier_core::{Cluster, Euclidean, Point, complete_link_distance};
///
/// let a = Cluster::new(vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)]);
/// let b = Cluster::new(vec![Point::new(4.0, 0.0, 0.0)]);
/// assert_eq!(complete_link_distance(&a, &b, &Euclidean), Some(4.0));
/// assert_eq!(complete_link_distance(&a, &Cluster::default(), &Euclidean), None);
/// ```
#[must_use]
pub fn complete_link_distance<M: DistanceMetric + ?Sized>(
    a: &Cluster,
    b: &Cluster,
    metric: &M,
) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    a.points()
        .iter()
        .flat_map(|p| b.points().iter().map(move |q| metric.distance(p, q)))
        .try_fold(0.0_f64, |farthest, distance| {
            (!distance.is_nan()).then(|| farthest.max(distance))
        })
}

/// Picks the candidate with the smallest complete-link distance to `cluster`.
///
/// Returns the candidate index and its distance. A later candidate only
/// replaces the current best when strictly closer, so exact ties keep the
/// earlier index. Empty candidates and candidates the metric cannot measure
/// are skipped; `None` is returned when no candidate could be measured.
#[must_use]
pub fn nearest_cluster<M: DistanceMetric + ?Sized>(
    cluster: &Cluster,
    candidates: &[Cluster],
    metric: &M,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let Some(distance) = complete_link_distance(cluster, candidate, metric) else {
            continue;
        };
        if best.is_none_or(|(_, current)| distance < current) {
            best = Some((index, distance));
        }
    }
    best
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LinkMode {
    Sequential,
    #[cfg(feature = "parallel")]
    Parallel,
}

/// Computes the parent table for a set of clustered levels.
///
/// # Examples
/// ```
/// use fogtier_core::{Cluster, Euclidean, LayerClusters, Linker, ParentLink, Point};
///
/// let at = |x: f64| Cluster::new(vec![Point::new(x, 0.0, 0.0)]);
/// let layers = vec![
///     LayerClusters::new(1, vec![at(0.0), at(100.0)]),
///     LayerClusters::new(2, vec![at(90.0), at(10.0)]),
///     LayerClusters::new(3, vec![at(50.0)]),
/// ];
/// let table = Linker::new().with_pinned_pre_root(false).link(&layers, &Euclidean)?;
/// assert_eq!(table.rows()[0], vec![ParentLink::Cluster(1), ParentLink::Cluster(0)]);
/// assert_eq!(table.rows()[1], vec![ParentLink::Cluster(0), ParentLink::Cluster(0)]);
/// assert_eq!(table.rows()[2], vec![ParentLink::Root]);
/// # Ok::<(), fogtier_core::HierarchyError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Linker {
    pinned_pre_root: bool,
    execution_strategy: ExecutionStrategy,
}

impl Default for Linker {
    fn default() -> Self {
        Self {
            pinned_pre_root: true,
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl Linker {
    /// Creates a linker that pins the pre-root level and picks its execution
    /// backend automatically.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether the level beneath the root is pinned to parent `0`.
    #[must_use]
    pub const fn with_pinned_pre_root(mut self, pinned: bool) -> Self {
        self.pinned_pre_root = pinned;
        self
    }

    /// Selects sequential or parallel execution.
    #[must_use]
    pub const fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns whether the pre-root level is pinned.
    #[must_use]
    pub const fn pinned_pre_root(&self) -> bool {
        self.pinned_pre_root
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub const fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Links every computed level to the level above it.
    ///
    /// `layers` must be ordered from level 1 upwards.
    ///
    /// # Errors
    /// Returns [`HierarchyError::InvalidLayerCount`] for fewer than two levels,
    /// [`HierarchyError::BackendUnavailable`] when parallel execution was
    /// requested without the `parallel` feature,
    /// [`HierarchyError::EmptyCluster`] when a cluster taking part in a
    /// comparison has no points, [`HierarchyError::NoCandidateParent`]
    /// when a populated level has no clusters above it (the pinned pre-root
    /// level included), and [`HierarchyError::NonFiniteDistance`] when the
    /// metric yields NaN for every candidate of a cluster.
    #[instrument(
        name = "linker.link_layers",
        err,
        skip(self, layers, metric),
        fields(
            layers = layers.len(),
            metric = metric.name(),
            pinned_pre_root = self.pinned_pre_root,
        ),
    )]
    pub fn link<M: DistanceMetric + ?Sized>(
        &self,
        layers: &[LayerClusters],
        metric: &M,
    ) -> Result<ParentTable> {
        let count = layers.len();
        if count < 2 {
            return Err(HierarchyError::InvalidLayerCount { got: count });
        }
        let mode = self.resolve_mode()?;

        let mut rows = vec![Vec::new(); count];
        rows[count - 1] = vec![ParentLink::Root];
        let computed = if self.pinned_pre_root {
            let (pre_root, root) = (&layers[count - 2], &layers[count - 1]);
            if !pre_root.is_empty() && root.is_empty() {
                return Err(HierarchyError::NoCandidateParent {
                    level: pre_root.level(),
                    parent_level: root.level(),
                });
            }
            rows[count - 2] = vec![ParentLink::Cluster(0)];
            count - 2
        } else {
            count - 1
        };

        for lower in (0..computed).rev() {
            rows[lower] = link_pair(&layers[lower], &layers[lower + 1], metric, mode)?;
            info!(
                level = layers[lower].level(),
                clusters = rows[lower].len(),
                "linked level to parents"
            );
        }

        #[cfg(feature = "metrics")]
        {
            let links: usize = rows.iter().take(computed).map(Vec::len).sum();
            metrics::counter!("fogtier_cluster_links_total").increment(links as u64);
        }

        Ok(ParentTable::from_rows(rows))
    }

    fn resolve_mode(&self) -> Result<LinkMode> {
        match self.execution_strategy {
            ExecutionStrategy::Sequential => Ok(LinkMode::Sequential),
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Auto | ExecutionStrategy::Parallel => Ok(LinkMode::Parallel),
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Auto => Ok(LinkMode::Sequential),
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel => Err(HierarchyError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            }),
        }
    }
}

fn link_pair<M: DistanceMetric + ?Sized>(
    lower: &LayerClusters,
    upper: &LayerClusters,
    metric: &M,
    mode: LinkMode,
) -> Result<Vec<ParentLink>> {
    if lower.is_empty() {
        return Ok(Vec::new());
    }
    if upper.is_empty() {
        return Err(HierarchyError::NoCandidateParent {
            level: lower.level(),
            parent_level: upper.level(),
        });
    }
    if let Some(cluster) = upper.clusters().iter().position(Cluster::is_empty) {
        return Err(HierarchyError::EmptyCluster {
            level: upper.level(),
            cluster,
        });
    }

    let link = |(index, cluster): (usize, &Cluster)| link_cluster(lower, upper, index, cluster, metric);
    match mode {
        LinkMode::Sequential => lower.clusters().iter().enumerate().map(link).collect(),
        #[cfg(feature = "parallel")]
        LinkMode::Parallel => {
            // Collected in index order so the first failing cluster is reported.
            let links: Vec<Result<ParentLink>> =
                lower.clusters().par_iter().enumerate().map(link).collect();
            links.into_iter().collect()
        }
    }
}

fn link_cluster<M: DistanceMetric + ?Sized>(
    lower: &LayerClusters,
    upper: &LayerClusters,
    index: usize,
    cluster: &Cluster,
    metric: &M,
) -> Result<ParentLink> {
    if cluster.is_empty() {
        return Err(HierarchyError::EmptyCluster {
            level: lower.level(),
            cluster: index,
        });
    }
    let (parent, distance) = nearest_cluster(cluster, upper.clusters(), metric).ok_or(
        HierarchyError::NonFiniteDistance {
            level: lower.level(),
            cluster: index,
        },
    )?;
    debug!(
        level = lower.level(),
        cluster = index,
        parent,
        distance,
        "assigned parent cluster"
    );
    Ok(ParentLink::Cluster(parent))
}
