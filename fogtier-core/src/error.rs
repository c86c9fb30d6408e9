//! Error types for the fogtier core library.
//!
//! Fatal planning failures are reported through [`HierarchyError`]; report
//! persistence failures use [`ReportError`] so callers can keep a computed
//! hierarchy when only the write-out failed.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::planner::ExecutionStrategy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error raised while configuring or constructing a [`crate::Hierarchy`].
///
/// Levels in error payloads are 1-based, matching [`crate::Node::level`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HierarchyError {
    /// The hierarchy needs at least a root and a layer beneath it.
    #[error("layer_count must be at least 2 (got {got})")]
    InvalidLayerCount {
        /// The rejected layer count.
        got: usize,
    },
    /// The per-layer distance table does not cover every layer.
    #[error("expected {expected} max distances, one per layer, but got {got}")]
    ThresholdCountMismatch {
        /// Number of configured layers.
        expected: usize,
        /// Number of thresholds supplied.
        got: usize,
    },
    /// A per-layer distance threshold was negative or non-finite.
    #[error("max distance for level {level} must be finite and non-negative (got {value})")]
    InvalidMaxDistance {
        /// Level whose threshold was rejected.
        level: usize,
        /// The rejected threshold.
        value: f64,
    },
    /// The per-layer target count table does not cover every layer.
    #[error("expected {expected} target counts, one per layer, but got {got}")]
    TargetCountMismatch {
        /// Number of configured layers.
        expected: usize,
        /// Number of target counts supplied.
        got: usize,
    },
    /// A per-layer target count was zero.
    #[error("target cluster count for level {level} must be at least 1")]
    ZeroTargetCount {
        /// Level whose target count was zero.
        level: usize,
    },
    /// A node referenced a level outside `1..=layer_count`.
    #[error("node {node} has level {level}, outside 1..={layer_count}")]
    LevelOutOfRange {
        /// Position of the node in the input slice.
        node: usize,
        /// The level carried by the node.
        level: usize,
        /// Number of configured layers.
        layer_count: usize,
    },
    /// A node carried a NaN or infinite coordinate.
    #[error("node {node} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the node in the input slice.
        node: usize,
    },
    /// A cluster without points took part in a complete-link comparison.
    #[error("cluster {cluster} on level {level} contains no points")]
    EmptyCluster {
        /// Level holding the empty cluster.
        level: usize,
        /// Index of the empty cluster within its level.
        cluster: usize,
    },
    /// The metric returned NaN for every candidate parent of a cluster.
    #[error("cluster {cluster} on level {level} has no finite distance to any parent candidate")]
    NonFiniteDistance {
        /// Level holding the cluster.
        level: usize,
        /// Index of the cluster within its level.
        cluster: usize,
    },
    /// A populated layer had no clusters above it to link to.
    #[error("level {level} has clusters but level {parent_level} has none to act as parents")]
    NoCandidateParent {
        /// Level that needed parents.
        level: usize,
        /// Level that should have supplied them.
        parent_level: usize,
    },
    /// The requested execution strategy is not compiled into this build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be honoured.
        requested: ExecutionStrategy,
    },
}

define_error_codes! {
    /// Stable codes describing [`HierarchyError`] variants.
    enum HierarchyErrorCode for HierarchyError {
        /// The hierarchy needs at least a root and a layer beneath it.
        InvalidLayerCount => InvalidLayerCount { .. } => "HIERARCHY_INVALID_LAYER_COUNT",
        /// The per-layer distance table does not cover every layer.
        ThresholdCountMismatch => ThresholdCountMismatch { .. } => "HIERARCHY_THRESHOLD_COUNT_MISMATCH",
        /// A per-layer distance threshold was negative or non-finite.
        InvalidMaxDistance => InvalidMaxDistance { .. } => "HIERARCHY_INVALID_MAX_DISTANCE",
        /// The per-layer target count table does not cover every layer.
        TargetCountMismatch => TargetCountMismatch { .. } => "HIERARCHY_TARGET_COUNT_MISMATCH",
        /// A per-layer target count was zero.
        ZeroTargetCount => ZeroTargetCount { .. } => "HIERARCHY_ZERO_TARGET_COUNT",
        /// A node referenced a level outside the configured range.
        LevelOutOfRange => LevelOutOfRange { .. } => "HIERARCHY_LEVEL_OUT_OF_RANGE",
        /// A node carried a NaN or infinite coordinate.
        NonFiniteCoordinate => NonFiniteCoordinate { .. } => "HIERARCHY_NON_FINITE_COORDINATE",
        /// A cluster without points took part in a complete-link comparison.
        EmptyCluster => EmptyCluster { .. } => "HIERARCHY_EMPTY_CLUSTER",
        /// The metric returned NaN for every candidate parent of a cluster.
        NonFiniteDistance => NonFiniteDistance { .. } => "HIERARCHY_NON_FINITE_DISTANCE",
        /// A populated layer had no clusters above it to link to.
        NoCandidateParent => NoCandidateParent { .. } => "HIERARCHY_NO_CANDIDATE_PARENT",
        /// The requested execution strategy is not compiled into this build.
        BackendUnavailable => BackendUnavailable { .. } => "HIERARCHY_BACKEND_UNAVAILABLE",
    }
}

impl HierarchyError {
    /// Returns `true` for errors caused by inconsistent configuration or
    /// input levels, as opposed to failures discovered while linking.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidLayerCount { .. }
                | Self::ThresholdCountMismatch { .. }
                | Self::InvalidMaxDistance { .. }
                | Self::TargetCountMismatch { .. }
                | Self::ZeroTargetCount { .. }
                | Self::LevelOutOfRange { .. }
                | Self::BackendUnavailable { .. }
        )
    }
}

/// Error raised while persisting a hierarchy report.
///
/// Report failures never invalidate the [`crate::Hierarchy`] they describe.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ReportError {
    /// Creating the report directory or writing a layer file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Encoding a layer document failed.
    #[error("failed to serialise level {level}: {source}")]
    Serialise {
        /// Level being rendered.
        level: usize,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The requested level does not exist in the hierarchy.
    #[error("level {level} is not part of the hierarchy")]
    UnknownLevel {
        /// The requested level.
        level: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ReportError`] variants.
    enum ReportErrorCode for ReportError {
        /// Creating the report directory or writing a layer file failed.
        Io => Io { .. } => "REPORT_IO",
        /// Encoding a layer document failed.
        Serialise => Serialise { .. } => "REPORT_SERIALISE",
        /// The requested level does not exist in the hierarchy.
        UnknownLevel => UnknownLevel { .. } => "REPORT_UNKNOWN_LEVEL",
    }
}

/// Convenient alias for results returned by the planning API.
pub type Result<T> = core::result::Result<T, HierarchyError>;
