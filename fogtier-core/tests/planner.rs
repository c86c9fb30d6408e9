//! Tests for the `HierarchyPlanner` orchestration API.

mod common;

use common::{node, nodes_at};
use fogtier_core::{
    AgglomerativeClusterer, ClusterRef, ClusterStrategy, DEFAULT_LAYER_COUNT, Euclidean,
    ExecutionStrategy, HierarchyError, HierarchyPlanner, HierarchyPlannerBuilder, Node,
    ParentLink, Planar, Point,
};
use fogtier_test_support::{
    layout::{districts, grid},
    tracing::RecordingLayer,
};
use proptest::prelude::*;
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

/// Three districts of five devices, a gateway in each district, one regional
/// aggregator and the cloud.
#[fixture]
fn town() -> Vec<Node> {
    let centres = [[0.0, 0.0], [1_000.0, 0.0], [2_000.0, 0.0]];
    let mut nodes = nodes_at(1, &districts(&centres, 10.0, 5));
    nodes.extend(centres.iter().map(|&[x, y]| Node::new(Point::new(x, y, 15.0), 2)));
    nodes.push(Node::new(Point::new(1_000.0, 50.0, 30.0), 3));
    nodes.push(Node::new(Point::new(1_000.0, 500.0, 0.0), 4));
    nodes
}

/// Two 4x4 blocks of devices 500 units apart, a gateway over each block and
/// the cloud between them.
#[fixture]
fn blocks() -> Vec<Node> {
    let mut nodes = nodes_at(1, &grid([0.0, 0.0], 4, 4, 10.0, 0.0));
    nodes.extend(nodes_at(1, &grid([500.0, 0.0], 4, 4, 10.0, 0.0)));
    nodes.push(Node::new(Point::new(15.0, 15.0, 0.0), 2));
    nodes.push(Node::new(Point::new(515.0, 15.0, 0.0), 2));
    nodes.push(node(250.0, 3));
    nodes
}

fn town_builder() -> HierarchyPlannerBuilder {
    HierarchyPlanner::builder()
        .with_layer_count(4)
        .with_max_distances(vec![50.0, 200.0, 5_000.0, 5_000.0])
}

#[rstest]
fn builder_defaults() {
    let builder = HierarchyPlannerBuilder::new();
    assert_eq!(builder.layer_count(), DEFAULT_LAYER_COUNT);
    assert_eq!(builder.target_counts(), &[100, 40, 20, 10, 3, 1, 1]);
    assert!(builder.pinned_pre_root());

    let planner = builder.build().expect("defaults valid");
    assert_eq!(planner.layer_count(), 7);
    assert_eq!(planner.cluster_strategy(), ClusterStrategy::Threshold);
    assert_eq!(planner.execution_strategy(), ExecutionStrategy::Auto);
}

#[rstest]
#[case::one_level(
    HierarchyPlannerBuilder::new().with_layer_count(1),
    HierarchyError::InvalidLayerCount { got: 1 },
)]
#[case::short_thresholds(
    HierarchyPlannerBuilder::new().with_max_distances(vec![1.0; 3]),
    HierarchyError::ThresholdCountMismatch { expected: 7, got: 3 },
)]
#[case::negative_threshold(
    HierarchyPlannerBuilder::new()
        .with_layer_count(2)
        .with_max_distances(vec![1.0, -1.0]),
    HierarchyError::InvalidMaxDistance { level: 2, value: -1.0 },
)]
#[case::long_counts(
    HierarchyPlannerBuilder::new()
        .with_cluster_strategy(ClusterStrategy::Count)
        .with_target_counts(vec![1; 8]),
    HierarchyError::TargetCountMismatch { expected: 7, got: 8 },
)]
#[case::zero_count(
    HierarchyPlannerBuilder::new()
        .with_cluster_strategy(ClusterStrategy::Count)
        .with_layer_count(2)
        .with_target_counts(vec![0, 1]),
    HierarchyError::ZeroTargetCount { level: 1 },
)]
fn builder_rejects_invalid_configuration(
    #[case] builder: HierarchyPlannerBuilder,
    #[case] expected: HierarchyError,
) {
    let err = builder.build().expect_err("configuration must be rejected");
    assert_eq!(err, expected);
    assert!(err.is_configuration());
}

#[rstest]
fn builder_ignores_the_inactive_table() {
    let planner = HierarchyPlannerBuilder::new()
        .with_layer_count(3)
        .with_max_distances(vec![1.0, 2.0, 3.0])
        .build()
        .expect("count table is not used by the threshold strategy");
    assert_eq!(planner.limits().len(), 3);
}

#[rstest]
fn builder_rejects_nan_threshold() {
    let err = HierarchyPlannerBuilder::new()
        .with_layer_count(2)
        .with_max_distances(vec![f64::NAN, 1.0])
        .build()
        .expect_err("NaN is not a distance");
    assert!(matches!(
        err,
        HierarchyError::InvalidMaxDistance { level: 1, value } if value.is_nan()
    ));
}

#[cfg(not(feature = "parallel"))]
#[rstest]
fn builder_rejects_parallel_without_feature() {
    let err = HierarchyPlannerBuilder::new()
        .with_execution_strategy(ExecutionStrategy::Parallel)
        .build()
        .expect_err("parallel backend is not compiled in");
    assert_eq!(
        err,
        HierarchyError::BackendUnavailable {
            requested: ExecutionStrategy::Parallel,
        }
    );
}

#[rstest]
fn plans_town_by_threshold(town: Vec<Node>) {
    let hierarchy = town_builder()
        .build()
        .expect("configuration must be valid")
        .plan(&town)
        .expect("plan must succeed");

    assert_eq!(hierarchy.layer_count(), 4);
    let sizes: Vec<usize> = hierarchy.layers().iter().map(|layer| layer.len()).collect();
    assert_eq!(sizes, vec![3, 3, 1, 1]);
    assert_eq!(hierarchy.parents().to_raw(), vec![
        vec![0, 1, 2],
        vec![0, 0, 0],
        vec![0],
        vec![-1],
    ]);
    assert_eq!(hierarchy.path_to_root(1, 2), vec![
        ClusterRef { level: 1, index: 2 },
        ClusterRef { level: 2, index: 2 },
        ClusterRef { level: 3, index: 0 },
        ClusterRef { level: 4, index: 0 },
    ]);
}

#[rstest]
fn grid_blocks_become_one_cluster_each(blocks: Vec<Node>) {
    // A block's diagonal is about 42.4, inside the 50 unit threshold.
    let hierarchy = HierarchyPlanner::builder()
        .with_layer_count(3)
        .with_max_distances(vec![50.0, 50.0, 50.0])
        .build()
        .expect("configuration must be valid")
        .plan(&blocks)
        .expect("plan must succeed");

    let devices = hierarchy.layer(1).expect("level 1 exists");
    assert_eq!(devices.len(), 2);
    assert!(devices.clusters().iter().all(|cluster| cluster.len() == 16));
    assert!(devices.clusters()[0].points().iter().all(|point| point.x() < 100.0));
    assert_eq!(hierarchy.parents().to_raw(), vec![vec![0, 1], vec![0], vec![-1]]);
}

#[rstest]
fn empty_root_level_fails_the_plan() {
    let nodes: Vec<Node> = (1..=6).map(|level| node(0.0, level)).collect();
    let err = HierarchyPlanner::builder()
        .build()
        .expect("defaults are valid")
        .plan(&nodes)
        .expect_err("the pre-root level has no root to point at");
    assert_eq!(
        err,
        HierarchyError::NoCandidateParent {
            level: 6,
            parent_level: 7,
        }
    );
}

#[rstest]
fn count_strategy_shares_the_linker(town: Vec<Node>) {
    let by_threshold = town_builder()
        .build()
        .expect("configuration must be valid")
        .plan(&town)
        .expect("plan must succeed");
    let by_count = HierarchyPlanner::builder()
        .with_layer_count(4)
        .with_cluster_strategy(ClusterStrategy::Count)
        .with_target_counts(vec![3, 3, 1, 1])
        .build()
        .expect("configuration must be valid")
        .plan(&town)
        .expect("plan must succeed");
    assert_eq!(by_count, by_threshold);
}

#[rstest]
#[case::auto(ExecutionStrategy::Auto)]
#[case::sequential(ExecutionStrategy::Sequential)]
fn execution_strategy_does_not_change_the_result(
    town: Vec<Node>,
    #[case] strategy: ExecutionStrategy,
) {
    let reference = town_builder()
        .with_execution_strategy(ExecutionStrategy::Sequential)
        .build()
        .expect("configuration must be valid")
        .plan(&town)
        .expect("plan must succeed");
    let hierarchy = town_builder()
        .with_execution_strategy(strategy)
        .build()
        .expect("configuration must be valid")
        .plan(&town)
        .expect("plan must succeed");
    assert_eq!(hierarchy, reference);
}

#[rstest]
fn locate_finds_the_serving_district(town: Vec<Node>) {
    let hierarchy = town_builder()
        .build()
        .expect("configuration must be valid")
        .plan(&town)
        .expect("plan must succeed");
    let probe = Point::new(1_003.0, -2.0, 0.0);
    assert_eq!(hierarchy.locate(probe, 1, &Euclidean), Some(1));
    assert_eq!(hierarchy.locate(probe, 2, &Euclidean), Some(1));
}

#[rstest]
fn metric_choice_changes_the_parent() {
    // The upper candidate straight overhead is far in 3-D but coincident on
    // the ground plane.
    let nodes = vec![
        node(0.0, 1),
        Node::new(Point::new(0.0, 0.0, 100.0), 2),
        node(30.0, 2),
        node(0.0, 3),
    ];
    let planner = HierarchyPlanner::builder()
        .with_layer_count(3)
        .with_max_distances(vec![1.0, 1.0, 1.0])
        .with_pinned_pre_root(false)
        .build()
        .expect("configuration must be valid");

    let spatial = planner
        .plan_with(&nodes, &AgglomerativeClusterer, &Euclidean)
        .expect("plan must succeed");
    let planar = planner
        .plan_with(&nodes, &AgglomerativeClusterer, &Planar)
        .expect("plan must succeed");
    assert_eq!(spatial.parent_of(1, 0), Some(ParentLink::Cluster(1)));
    assert_eq!(planar.parent_of(1, 0), Some(ParentLink::Cluster(0)));
}

#[rstest]
fn rejects_nodes_outside_the_layer_range(town: Vec<Node>) {
    let mut nodes = town;
    nodes.push(node(0.0, 5));
    let index = nodes.len() - 1;
    let err = town_builder()
        .build()
        .expect("configuration must be valid")
        .plan(&nodes)
        .expect_err("level 5 does not exist");
    assert_eq!(
        err,
        HierarchyError::LevelOutOfRange {
            node: index,
            level: 5,
            layer_count: 4,
        }
    );
}

#[rstest]
fn empty_middle_level_has_no_candidate_parent() {
    let nodes = vec![node(0.0, 1), node(0.0, 3), node(0.0, 4)];
    let err = town_builder()
        .build()
        .expect("configuration must be valid")
        .plan(&nodes)
        .expect_err("level 1 has nothing to link to");
    assert_eq!(
        err,
        HierarchyError::NoCandidateParent {
            level: 1,
            parent_level: 2,
        }
    );
}

#[rstest]
fn empty_lowest_level_yields_an_empty_row() {
    let nodes = vec![node(0.0, 2), node(0.0, 3), node(0.0, 4)];
    let hierarchy = town_builder()
        .build()
        .expect("configuration must be valid")
        .plan(&nodes)
        .expect("an empty lowest level is tolerated");
    assert!(hierarchy.layer(1).is_some_and(|layer| layer.is_empty()));
    assert_eq!(hierarchy.parents().row(1), Some(&[][..]));
}

#[rstest]
fn plan_records_tracing(town: Vec<Node>) {
    // Rayon workers do not inherit the scoped subscriber, so link events are
    // only observable on the calling thread.
    let planner = town_builder()
        .with_execution_strategy(ExecutionStrategy::Sequential)
        .build()
        .expect("configuration must be valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let hierarchy = tracing::subscriber::with_default(subscriber, || planner.plan(&town))
        .expect("plan must succeed");
    assert_eq!(hierarchy.layer_count(), 4);

    let plan = layer.span("planner.plan").expect("planner.plan span must exist");
    assert_eq!(plan.field("nodes"), Some(town.len().to_string().as_str()));
    assert_eq!(plan.field("layers"), Some("4"));
    assert_eq!(plan.field("metric"), Some("euclidean"));
    assert_eq!(plan.field("clusterer"), Some("agglomerative-complete-link"));
    assert_eq!(plan.field("strategy"), Some("Threshold"));

    let link = layer
        .span("linker.link_layers")
        .expect("linker.link_layers span must exist");
    assert_eq!(link.parent.as_deref(), Some("planner.plan"));
    assert_eq!(link.field("pinned_pre_root"), Some("true"));

    let clustered = layer.events_with_message("clustered level");
    assert_eq!(clustered.len(), 4);
    assert!(clustered.iter().all(|event| event.level == Level::INFO));
    assert_eq!(clustered[0].field("clusters"), Some("3"));

    let links = layer.events_with_message("assigned parent cluster");
    assert_eq!(links.len(), 6);
    assert!(links.iter().all(|event| event.level == Level::DEBUG));
}

#[rstest]
fn plan_warns_about_empty_levels() {
    let planner = town_builder()
        .build()
        .expect("configuration must be valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let nodes = vec![node(0.0, 2), node(0.0, 3), node(0.0, 4)];

    tracing::subscriber::with_default(subscriber, || planner.plan(&nodes))
        .expect("plan must succeed");

    let warnings = layer.events_with_message("level has no nodes");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, Level::WARN);
    assert_eq!(warnings[0].field("level"), Some("1"));
}

#[rstest]
fn failed_plan_records_the_error() {
    let planner = town_builder()
        .build()
        .expect("configuration must be valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || planner.plan(&[node(0.0, 9)]))
        .expect_err("level 9 is out of range");

    assert!(layer.events().iter().any(|event| {
        event.level == Level::ERROR && event.span.as_deref() == Some("planner.plan")
    }));
}

fn populated_nodes() -> impl Strategy<Value = Vec<Node>> {
    let coordinate = -5_000.0..5_000.0f64;
    prop::collection::vec(
        prop::collection::vec((coordinate.clone(), coordinate), 1..8),
        4,
    )
    .prop_map(|levels| {
        levels
            .into_iter()
            .enumerate()
            .flat_map(|(index, points)| {
                points
                    .into_iter()
                    .map(move |(x, y)| Node::new(Point::new(x, y, 0.0), index + 1))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn populated_levels_always_plan(nodes in populated_nodes(), pinned in any::<bool>()) {
        let planner = town_builder()
            .with_pinned_pre_root(pinned)
            .build()
            .expect("configuration must be valid");
        let hierarchy = planner.plan(&nodes).expect("populated levels must plan");

        let clustered: usize = hierarchy.layers().iter().map(|layer| layer.point_count()).sum();
        prop_assert_eq!(clustered, nodes.len());
        prop_assert_eq!(hierarchy.parents().len(), 4);
        for level in 1..=3 {
            let layer = hierarchy.layer(level).expect("level exists");
            for cluster in 0..layer.len() {
                let path = hierarchy.path_to_root(level, cluster);
                prop_assert_eq!(path.first(), Some(&ClusterRef { level, index: cluster }));
                for step in path.windows(2) {
                    prop_assert_eq!(step[1].level, step[0].level + 1);
                }
            }
        }
    }
}
