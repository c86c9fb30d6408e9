//! Hierarchy planning orchestration.
//!
//! Provides the [`HierarchyPlanner`] entry point, which partitions nodes by
//! level, clusters every level and links the clustered levels into a
//! [`Hierarchy`].

mod builder;

use tracing::{info, instrument, warn};

use crate::{
    Result,
    cluster::{AgglomerativeClusterer, ClusterLimit, Clusterer, LayerClusters},
    distance::{DistanceMetric, Euclidean},
    geometry::Node,
    hierarchy::Hierarchy,
    linker::Linker,
    partition::partition_by_level,
};

pub use self::builder::{
    ClusterStrategy, DEFAULT_LAYER_COUNT, DEFAULT_MAX_DISTANCES, DEFAULT_TARGET_COUNTS,
    ExecutionStrategy, HierarchyPlannerBuilder,
};

/// Entry point for building a [`Hierarchy`] from located nodes.
///
/// # Examples
/// ```
/// use fogtier_core::{HierarchyPlanner, Node, ParentLink, Point};
///
/// let nodes = [
///     Node::new(Point::new(0.0, 0.0, 0.0), 1),
///     Node::new(Point::new(10.0, 0.0, 0.0), 1),
///     Node::new(Point::new(5000.0, 0.0, 0.0), 1),
///     Node::new(Point::new(5.0, 5.0, 0.0), 2),
///     Node::new(Point::new(4990.0, 0.0, 0.0), 2),
///     Node::new(Point::new(2500.0, 0.0, 0.0), 3),
/// ];
/// let planner = HierarchyPlanner::builder()
///     .with_layer_count(3)
///     .with_max_distances(vec![100.0, 100.0, 100.0])
///     .with_pinned_pre_root(false)
///     .build()?;
/// let hierarchy = planner.plan(&nodes)?;
///
/// assert_eq!(hierarchy.layer(1).map(|l| l.len()), Some(2));
/// assert_eq!(hierarchy.parent_of(1, 0), Some(ParentLink::Cluster(0)));
/// assert_eq!(hierarchy.parent_of(1, 1), Some(ParentLink::Cluster(1)));
/// assert_eq!(hierarchy.parent_of(3, 0), Some(ParentLink::Root));
/// # Ok::<(), fogtier_core::HierarchyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HierarchyPlanner {
    limits: Vec<ClusterLimit>,
    cluster_strategy: ClusterStrategy,
    pinned_pre_root: bool,
    execution_strategy: ExecutionStrategy,
}

impl HierarchyPlanner {
    pub(crate) const fn new(
        limits: Vec<ClusterLimit>,
        cluster_strategy: ClusterStrategy,
        pinned_pre_root: bool,
        execution_strategy: ExecutionStrategy,
    ) -> Self {
        Self {
            limits,
            cluster_strategy,
            pinned_pre_root,
            execution_strategy,
        }
    }

    /// Returns a builder populated with the default deployment.
    #[must_use]
    pub fn builder() -> HierarchyPlannerBuilder {
        HierarchyPlannerBuilder::new()
    }

    /// Returns the number of levels every planned hierarchy has.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.limits.len()
    }

    /// Returns the clustering limit applied to each level, lowest first.
    #[must_use]
    pub fn limits(&self) -> &[ClusterLimit] {
        &self.limits
    }

    /// Returns the clustering strategy.
    #[must_use]
    pub const fn cluster_strategy(&self) -> ClusterStrategy {
        self.cluster_strategy
    }

    /// Returns whether the pre-root level is pinned.
    #[must_use]
    pub const fn pinned_pre_root(&self) -> bool {
        self.pinned_pre_root
    }

    /// Returns the linker execution strategy.
    #[must_use]
    pub const fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Plans a hierarchy with the built-in complete-link clusterer and the
    /// 3-D [`Euclidean`] metric.
    ///
    /// # Errors
    /// Propagates every [`crate::HierarchyError`] raised by
    /// [`Self::plan_with`].
    pub fn plan(&self, nodes: &[Node]) -> Result<Hierarchy> {
        self.plan_with(nodes, &AgglomerativeClusterer, &Euclidean)
    }

    /// Plans a hierarchy with a caller-supplied clusterer and metric.
    ///
    /// The run either returns a complete hierarchy or fails without partial
    /// output.
    ///
    /// # Errors
    /// Returns [`crate::HierarchyError::LevelOutOfRange`] or
    /// [`crate::HierarchyError::NonFiniteCoordinate`] for invalid nodes, and
    /// any linking error described on [`Linker::link`].
    #[instrument(
        name = "planner.plan",
        err,
        skip(self, nodes, clusterer, metric),
        fields(
            nodes = nodes.len(),
            layers = self.layer_count(),
            clusterer = clusterer.name(),
            metric = metric.name(),
            strategy = ?self.cluster_strategy,
        ),
    )]
    pub fn plan_with<C, M>(&self, nodes: &[Node], clusterer: &C, metric: &M) -> Result<Hierarchy>
    where
        C: Clusterer + ?Sized,
        M: DistanceMetric + ?Sized,
    {
        let points = partition_by_level(nodes, self.layer_count())?;
        let dyn_metric: &dyn DistanceMetric = &metric;

        let layers: Vec<LayerClusters> = points
            .iter()
            .zip(&self.limits)
            .enumerate()
            .map(|(index, (level_points, &limit))| {
                let level = index + 1;
                if level_points.is_empty() {
                    warn!(level, "level has no nodes");
                }
                let clusters = clusterer.cluster(level_points, limit, dyn_metric);
                info!(
                    level,
                    points = level_points.len(),
                    clusters = clusters.len(),
                    "clustered level"
                );
                LayerClusters::new(level, clusters)
            })
            .collect();

        let parents = Linker::new()
            .with_pinned_pre_root(self.pinned_pre_root)
            .with_execution_strategy(self.execution_strategy)
            .link(&layers, metric)?;

        Ok(Hierarchy::new(layers, parents))
    }
}
