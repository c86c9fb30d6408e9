//! Fogtier core library.
//!
//! Builds a fixed-depth hierarchy over spatially located nodes: nodes are
//! partitioned by level, clustered inside each level and every cluster is
//! linked to the complete-link nearest cluster of the level above.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cluster;
mod distance;
mod error;
mod geometry;
mod hierarchy;
mod linker;
mod partition;
mod planner;
mod report;

pub use crate::{
    cluster::{AgglomerativeClusterer, Cluster, ClusterLimit, Clusterer, LayerClusters},
    distance::{DistanceMetric, Euclidean, Planar},
    error::{HierarchyError, HierarchyErrorCode, ReportError, ReportErrorCode, Result},
    geometry::{Node, Point},
    hierarchy::{ClusterRef, Hierarchy, ParentLink, ParentTable},
    linker::{Linker, complete_link_distance, nearest_cluster},
    partition::partition_by_level,
    planner::{
        ClusterStrategy, DEFAULT_LAYER_COUNT, DEFAULT_MAX_DISTANCES, DEFAULT_TARGET_COUNTS,
        ExecutionStrategy, HierarchyPlanner, HierarchyPlannerBuilder,
    },
    report::{ReportSummary, ReportWriter, render_layer},
};
