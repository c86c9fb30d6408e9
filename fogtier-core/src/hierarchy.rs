//! The multi-layer cluster hierarchy produced by a planning run.

use crate::{
    cluster::{Cluster, LayerClusters},
    distance::DistanceMetric,
    geometry::Point,
    linker::nearest_cluster,
};

/// Parent of a cluster in the next level up.
///
/// # Examples
/// ```
/// use fogtier_core::ParentLink;
///
/// assert_eq!(ParentLink::Cluster(3).as_raw(), 3);
/// assert_eq!(ParentLink::Root.as_raw(), -1);
/// assert_eq!(ParentLink::Root.cluster(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParentLink {
    /// Index of the parent cluster within the next level.
    Cluster(usize),
    /// The cluster is the root of the hierarchy.
    Root,
}

impl ParentLink {
    /// Returns the parent cluster index, or `None` for the root.
    #[must_use]
    pub const fn cluster(self) -> Option<usize> {
        match self {
            Self::Cluster(index) => Some(index),
            Self::Root => None,
        }
    }

    /// Returns the integer encoding used by persisted reports, where the root
    /// is `-1`.
    #[must_use]
    pub fn as_raw(self) -> i64 {
        match self {
            Self::Cluster(index) => i64::try_from(index).unwrap_or(i64::MAX),
            Self::Root => -1,
        }
    }
}

/// Per-level parent assignments.
///
/// Row `i` describes level `i + 1`; entry `c` of that row names the parent of
/// cluster `c` within level `i + 2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentTable {
    rows: Vec<Vec<ParentLink>>,
}

impl ParentTable {
    pub(crate) const fn from_rows(rows: Vec<Vec<ParentLink>>) -> Self {
        Self { rows }
    }

    /// Returns every row, lowest level first.
    #[must_use]
    pub fn rows(&self) -> &[Vec<ParentLink>] {
        &self.rows
    }

    /// Returns the row for the 1-based `level`.
    #[must_use]
    pub fn row(&self, level: usize) -> Option<&[ParentLink]> {
        level
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .map(Vec::as_slice)
    }

    /// Returns the number of rows, which equals the layer count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the table in its integer encoding.
    ///
    /// # Examples
    /// ```
    /// use fogtier_core::{Cluster, Euclidean, LayerClusters, Linker, Point};
    ///
    /// let layers = vec![
    ///     LayerClusters::new(1, vec![Cluster::new(vec![Point::new(0.0, 0.0, 0.0)])]),
    ///     LayerClusters::new(2, vec![Cluster::new(vec![Point::new(1.0, 0.0, 0.0)])]),
    /// ];
    /// let table = Linker::new().link(&layers, &Euclidean)?;
    /// assert_eq!(table.to_raw(), vec![vec![0], vec![-1]]);
    /// # Ok::<(), fogtier_core::HierarchyError>(())
    /// ```
    #[must_use]
    pub fn to_raw(&self) -> Vec<Vec<i64>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|link| link.as_raw()).collect())
            .collect()
    }
}

/// Position of a cluster within the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClusterRef {
    /// 1-based level.
    pub level: usize,
    /// Index of the cluster within its level.
    pub index: usize,
}

/// Clustered levels plus the parent table linking them.
///
/// A hierarchy is immutable once built; re-planning produces a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
    layers: Vec<LayerClusters>,
    parents: ParentTable,
}

impl Hierarchy {
    pub(crate) const fn new(layers: Vec<LayerClusters>, parents: ParentTable) -> Self {
        Self { layers, parents }
    }

    /// Returns the number of levels.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns every level, lowest first.
    #[must_use]
    pub fn layers(&self) -> &[LayerClusters] {
        &self.layers
    }

    /// Returns the clusters of the 1-based `level`.
    #[must_use]
    pub fn layer(&self, level: usize) -> Option<&LayerClusters> {
        level.checked_sub(1).and_then(|index| self.layers.get(index))
    }

    /// Returns the parent table.
    #[must_use]
    pub const fn parents(&self) -> &ParentTable {
        &self.parents
    }

    /// Returns the parent of `cluster` on `level`.
    ///
    /// `None` means the cluster does not exist or its row was pinned without
    /// an entry for it.
    #[must_use]
    pub fn parent_of(&self, level: usize, cluster: usize) -> Option<ParentLink> {
        self.parents.row(level)?.get(cluster).copied()
    }

    /// Walks from `cluster` on `level` towards the root.
    ///
    /// The returned chain starts with the given cluster and ends at the root
    /// or at the first cluster whose recorded parent is missing or does not
    /// exist in the level above.
    ///
    /// # Examples
    /// ```
    /// use fogtier_core::{ClusterRef, HierarchyPlanner, Node, Point};
    ///
    /// let nodes = [
    ///     Node::new(Point::new(0.0, 0.0, 0.0), 1),
    ///     Node::new(Point::new(5.0, 0.0, 0.0), 2),
    ///     Node::new(Point::new(9.0, 0.0, 0.0), 3),
    /// ];
    /// let planner = HierarchyPlanner::builder()
    ///     .with_layer_count(3)
    ///     .with_max_distances(vec![10.0, 10.0, 10.0])
    ///     .build()?;
    /// let hierarchy = planner.plan(&nodes)?;
    /// let path = hierarchy.path_to_root(1, 0);
    /// assert_eq!(path.last(), Some(&ClusterRef { level: 3, index: 0 }));
    /// assert_eq!(path.len(), 3);
    /// # Ok::<(), fogtier_core::HierarchyError>(())
    /// ```
    #[must_use]
    pub fn path_to_root(&self, level: usize, cluster: usize) -> Vec<ClusterRef> {
        let mut path = Vec::new();
        if self.layer(level).and_then(|layer| layer.get(cluster)).is_none() {
            return path;
        }

        let mut current = ClusterRef {
            level,
            index: cluster,
        };
        path.push(current);
        while let Some(ParentLink::Cluster(parent)) = self.parent_of(current.level, current.index)
        {
            let level = current.level + 1;
            if self.layer(level).and_then(|layer| layer.get(parent)).is_none() {
                break;
            }
            current = ClusterRef {
                level,
                index: parent,
            };
            path.push(current);
        }
        path
    }

    /// Finds the cluster on `level` that would serve `point`.
    ///
    /// Uses the complete-link rule with `point` as a single-member cluster:
    /// the winner is the cluster whose farthest member is closest.
    #[must_use]
    pub fn locate<M: DistanceMetric + ?Sized>(
        &self,
        point: Point,
        level: usize,
        metric: &M,
    ) -> Option<usize> {
        let layer = self.layer(level)?;
        let probe = Cluster::new(vec![point]);
        nearest_cluster(&probe, layer.clusters(), metric).map(|(index, _)| index)
    }
}
