//! Builder utilities for configuring hierarchy planning.
//!
//! Exposes the clustering and execution strategy selection surface and the
//! validation performed before a [`HierarchyPlanner`] is constructed.

use std::num::NonZeroUsize;

use crate::{Result, cluster::ClusterLimit, error::HierarchyError};

use super::HierarchyPlanner;

/// Number of levels in the default edge-to-cloud deployment.
pub const DEFAULT_LAYER_COUNT: usize = 7;

/// Default maximum intra-cluster distance per level, lowest level first.
pub const DEFAULT_MAX_DISTANCES: [f64; DEFAULT_LAYER_COUNT] =
    [200.0, 500.0, 750.0, 1250.0, 1000.0, 3000.0, 4000.0];

/// Default target cluster count per level, lowest level first.
pub const DEFAULT_TARGET_COUNTS: [usize; DEFAULT_LAYER_COUNT] = [100, 40, 20, 10, 3, 1, 1];

/// Indicates how the linker is executed.
///
/// `Auto` selects the rayon-backed implementation when the `parallel` feature
/// is compiled in and falls back to sequential execution otherwise. Both
/// produce identical parent tables.
///
/// # Examples
/// ```
/// use fogtier_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Auto;
/// assert!(matches!(strategy, ExecutionStrategy::Auto));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Allow the library to select an appropriate backend automatically.
    Auto,
    /// Link on the calling thread.
    Sequential,
    /// Link lower clusters concurrently on the rayon pool.
    Parallel,
}

/// Selects which per-level table bounds the intra-layer clusterer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterStrategy {
    /// Bound each cluster's diameter by the level's maximum distance.
    Threshold,
    /// Merge until the level's target cluster count is reached.
    Count,
}

/// Configures and constructs [`HierarchyPlanner`] instances.
///
/// # Examples
/// ```
/// use fogtier_core::{ClusterStrategy, HierarchyPlannerBuilder};
///
/// let planner = HierarchyPlannerBuilder::new()
///     .with_layer_count(3)
///     .with_target_counts(vec![4, 2, 1])
///     .with_cluster_strategy(ClusterStrategy::Count)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(planner.layer_count(), 3);
/// assert_eq!(planner.cluster_strategy(), ClusterStrategy::Count);
/// ```
#[derive(Debug, Clone)]
pub struct HierarchyPlannerBuilder {
    layer_count: usize,
    max_distances: Vec<f64>,
    target_counts: Vec<usize>,
    cluster_strategy: ClusterStrategy,
    pinned_pre_root: bool,
    execution_strategy: ExecutionStrategy,
}

impl Default for HierarchyPlannerBuilder {
    fn default() -> Self {
        Self {
            layer_count: DEFAULT_LAYER_COUNT,
            max_distances: DEFAULT_MAX_DISTANCES.to_vec(),
            target_counts: DEFAULT_TARGET_COUNTS.to_vec(),
            cluster_strategy: ClusterStrategy::Threshold,
            pinned_pre_root: true,
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl HierarchyPlannerBuilder {
    /// Creates a builder populated with the default seven-level deployment.
    ///
    /// # Examples
    /// ```
    /// use fogtier_core::{ClusterStrategy, ExecutionStrategy, HierarchyPlannerBuilder};
    ///
    /// let builder = HierarchyPlannerBuilder::new();
    /// assert_eq!(builder.layer_count(), 7);
    /// assert_eq!(builder.max_distances()[0], 200.0);
    /// assert_eq!(builder.cluster_strategy(), ClusterStrategy::Threshold);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of levels.
    #[must_use]
    pub const fn with_layer_count(mut self, layer_count: usize) -> Self {
        self.layer_count = layer_count;
        self
    }

    /// Returns the configured number of levels.
    #[must_use]
    pub const fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Overrides the per-level maximum intra-cluster distances.
    #[must_use]
    pub fn with_max_distances(mut self, max_distances: Vec<f64>) -> Self {
        self.max_distances = max_distances;
        self
    }

    /// Returns the configured per-level maximum distances.
    #[must_use]
    pub fn max_distances(&self) -> &[f64] {
        &self.max_distances
    }

    /// Overrides the per-level target cluster counts.
    #[must_use]
    pub fn with_target_counts(mut self, target_counts: Vec<usize>) -> Self {
        self.target_counts = target_counts;
        self
    }

    /// Returns the configured per-level target counts.
    #[must_use]
    pub fn target_counts(&self) -> &[usize] {
        &self.target_counts
    }

    /// Selects which per-level table drives the clusterer.
    #[must_use]
    pub const fn with_cluster_strategy(mut self, strategy: ClusterStrategy) -> Self {
        self.cluster_strategy = strategy;
        self
    }

    /// Returns the configured clustering strategy.
    #[must_use]
    pub const fn cluster_strategy(&self) -> ClusterStrategy {
        self.cluster_strategy
    }

    /// Controls whether the level beneath the root is pinned to parent `0`.
    #[must_use]
    pub const fn with_pinned_pre_root(mut self, pinned: bool) -> Self {
        self.pinned_pre_root = pinned;
        self
    }

    /// Returns whether the pre-root level is pinned.
    #[must_use]
    pub const fn pinned_pre_root(&self) -> bool {
        self.pinned_pre_root
    }

    /// Sets the execution strategy used by the linker.
    #[must_use]
    pub const fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub const fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs a [`HierarchyPlanner`].
    ///
    /// Only the table selected by the clustering strategy is validated, so a
    /// threshold-driven planner may keep the default seven-entry count table
    /// while using a different layer count.
    ///
    /// # Errors
    /// Returns [`HierarchyError::InvalidLayerCount`] for fewer than two
    /// levels, [`HierarchyError::ThresholdCountMismatch`] or
    /// [`HierarchyError::TargetCountMismatch`] when the active table does not
    /// have one entry per level, [`HierarchyError::InvalidMaxDistance`] for
    /// negative or non-finite thresholds, [`HierarchyError::ZeroTargetCount`]
    /// for zero counts, and [`HierarchyError::BackendUnavailable`] when
    /// parallel execution is requested without the `parallel` feature.
    ///
    /// # Examples
    /// ```
    /// use fogtier_core::{HierarchyError, HierarchyPlannerBuilder};
    ///
    /// let err = HierarchyPlannerBuilder::new()
    ///     .with_layer_count(1)
    ///     .build()
    ///     .expect_err("one level is not a hierarchy");
    /// assert_eq!(err, HierarchyError::InvalidLayerCount { got: 1 });
    /// ```
    pub fn build(self) -> Result<HierarchyPlanner> {
        if self.layer_count < 2 {
            return Err(HierarchyError::InvalidLayerCount {
                got: self.layer_count,
            });
        }
        #[cfg(not(feature = "parallel"))]
        if self.execution_strategy == ExecutionStrategy::Parallel {
            return Err(HierarchyError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            });
        }

        let limits = match self.cluster_strategy {
            ClusterStrategy::Threshold => self.distance_limits()?,
            ClusterStrategy::Count => self.count_limits()?,
        };

        Ok(HierarchyPlanner::new(
            limits,
            self.cluster_strategy,
            self.pinned_pre_root,
            self.execution_strategy,
        ))
    }

    fn distance_limits(&self) -> Result<Vec<ClusterLimit>> {
        if self.max_distances.len() != self.layer_count {
            return Err(HierarchyError::ThresholdCountMismatch {
                expected: self.layer_count,
                got: self.max_distances.len(),
            });
        }
        self.max_distances
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                if value.is_finite() && value >= 0.0 {
                    Ok(ClusterLimit::MaxDistance(value))
                } else {
                    Err(HierarchyError::InvalidMaxDistance {
                        level: index + 1,
                        value,
                    })
                }
            })
            .collect()
    }

    fn count_limits(&self) -> Result<Vec<ClusterLimit>> {
        if self.target_counts.len() != self.layer_count {
            return Err(HierarchyError::TargetCountMismatch {
                expected: self.layer_count,
                got: self.target_counts.len(),
            });
        }
        self.target_counts
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                NonZeroUsize::new(value)
                    .map(ClusterLimit::TargetCount)
                    .ok_or(HierarchyError::ZeroTargetCount { level: index + 1 })
            })
            .collect()
    }
}
