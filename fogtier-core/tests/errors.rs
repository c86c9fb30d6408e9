use std::{io, path::PathBuf};

use fogtier_core::{
    ExecutionStrategy, HierarchyError, HierarchyErrorCode, ReportError, ReportErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(
    HierarchyError::InvalidLayerCount { got: 1 },
    HierarchyErrorCode::InvalidLayerCount,
    "HIERARCHY_INVALID_LAYER_COUNT",
)]
#[case(
    HierarchyError::ThresholdCountMismatch { expected: 7, got: 3 },
    HierarchyErrorCode::ThresholdCountMismatch,
    "HIERARCHY_THRESHOLD_COUNT_MISMATCH",
)]
#[case(
    HierarchyError::InvalidMaxDistance { level: 2, value: -1.0 },
    HierarchyErrorCode::InvalidMaxDistance,
    "HIERARCHY_INVALID_MAX_DISTANCE",
)]
#[case(
    HierarchyError::TargetCountMismatch { expected: 7, got: 6 },
    HierarchyErrorCode::TargetCountMismatch,
    "HIERARCHY_TARGET_COUNT_MISMATCH",
)]
#[case(
    HierarchyError::ZeroTargetCount { level: 4 },
    HierarchyErrorCode::ZeroTargetCount,
    "HIERARCHY_ZERO_TARGET_COUNT",
)]
#[case(
    HierarchyError::LevelOutOfRange { node: 0, level: 9, layer_count: 7 },
    HierarchyErrorCode::LevelOutOfRange,
    "HIERARCHY_LEVEL_OUT_OF_RANGE",
)]
#[case(
    HierarchyError::NonFiniteCoordinate { node: 3 },
    HierarchyErrorCode::NonFiniteCoordinate,
    "HIERARCHY_NON_FINITE_COORDINATE",
)]
#[case(
    HierarchyError::EmptyCluster { level: 1, cluster: 0 },
    HierarchyErrorCode::EmptyCluster,
    "HIERARCHY_EMPTY_CLUSTER",
)]
#[case(
    HierarchyError::NonFiniteDistance { level: 2, cluster: 1 },
    HierarchyErrorCode::NonFiniteDistance,
    "HIERARCHY_NON_FINITE_DISTANCE",
)]
#[case(
    HierarchyError::NoCandidateParent { level: 2, parent_level: 3 },
    HierarchyErrorCode::NoCandidateParent,
    "HIERARCHY_NO_CANDIDATE_PARENT",
)]
#[case(
    HierarchyError::BackendUnavailable { requested: ExecutionStrategy::Parallel },
    HierarchyErrorCode::BackendUnavailable,
    "HIERARCHY_BACKEND_UNAVAILABLE",
)]
fn returns_expected_hierarchy_code(
    #[case] error: HierarchyError,
    #[case] expected: HierarchyErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), text);
    assert_eq!(expected.to_string(), text);
}

#[rstest]
#[case(HierarchyError::InvalidLayerCount { got: 0 }, true)]
#[case(HierarchyError::LevelOutOfRange { node: 0, level: 0, layer_count: 7 }, true)]
#[case(HierarchyError::ZeroTargetCount { level: 1 }, true)]
#[case(HierarchyError::NonFiniteCoordinate { node: 0 }, false)]
#[case(HierarchyError::EmptyCluster { level: 1, cluster: 0 }, false)]
#[case(HierarchyError::NoCandidateParent { level: 1, parent_level: 2 }, false)]
#[case(HierarchyError::NonFiniteDistance { level: 1, cluster: 0 }, false)]
fn classifies_configuration_errors(#[case] error: HierarchyError, #[case] expected: bool) {
    assert_eq!(error.is_configuration(), expected);
}

#[rstest]
fn display_names_the_offending_level() {
    let err = HierarchyError::NoCandidateParent {
        level: 2,
        parent_level: 3,
    };
    assert_eq!(
        err.to_string(),
        "level 2 has clusters but level 3 has none to act as parents"
    );
}

#[rstest]
fn returns_expected_report_codes() {
    let io = ReportError::Io {
        path: PathBuf::from("out"),
        source: io::Error::from(io::ErrorKind::PermissionDenied),
    };
    assert_eq!(io.code(), ReportErrorCode::Io);
    assert_eq!(io.code().as_str(), "REPORT_IO");

    let serialise = ReportError::Serialise {
        level: 1,
        source: serde_json::from_str::<serde_json::Value>("{").expect_err("truncated JSON"),
    };
    assert_eq!(serialise.code().as_str(), "REPORT_SERIALISE");

    let unknown = ReportError::UnknownLevel { level: 9 };
    assert_eq!(unknown.code(), ReportErrorCode::UnknownLevel);
    assert_eq!(unknown.to_string(), "level 9 is not part of the hierarchy");
}
