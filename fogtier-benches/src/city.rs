//! Seeded synthetic cities.
//!
//! A city scatters nodes uniformly over a square, with fewer nodes on every
//! level up, mimicking devices, gateways and aggregators thinning out towards
//! the cloud.

use fogtier_core::{
    ClusterStrategy, DEFAULT_LAYER_COUNT, HierarchyPlanner, LayerClusters, Node, Point,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Highest altitude a generated node may sit at.
const MAX_ALTITUDE: f64 = 60.0;

/// Configuration for a synthetic city.
#[derive(Clone, Debug)]
pub struct CityConfig {
    /// Nodes per level, lowest first; its length is the layer count.
    pub nodes_per_level: Vec<usize>,
    /// Side length of the square the city covers.
    pub extent: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl CityConfig {
    /// Seven levels whose node counts shrink fourfold per level, starting at
    /// `edge_nodes` and never dropping below one.
    #[must_use]
    pub fn tapered(edge_nodes: usize, extent: f64, seed: u64) -> Self {
        let nodes_per_level = (0_u32..)
            .take(DEFAULT_LAYER_COUNT)
            .map(|level| edge_nodes.checked_shr(level.saturating_mul(2)).unwrap_or(0).max(1))
            .collect();
        Self {
            nodes_per_level,
            extent,
            seed,
        }
    }
}

/// Generates the nodes of a city, level by level.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when no levels are configured and
/// [`BenchSetupError::InvalidFloatParameter`] when the extent is not a finite
/// positive number.
pub fn generate(config: &CityConfig) -> Result<Vec<Node>, BenchSetupError> {
    if config.nodes_per_level.is_empty() {
        return Err(BenchSetupError::ZeroValue {
            context: "layer count",
        });
    }
    if !config.extent.is_finite() || config.extent <= 0.0 {
        return Err(BenchSetupError::InvalidFloatParameter { parameter: "extent" });
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let total = config.nodes_per_level.iter().sum();
    let mut nodes = Vec::with_capacity(total);
    for (level, &count) in (1..).zip(&config.nodes_per_level) {
        for _ in 0..count {
            let point = Point::new(
                rng.gen_range(0.0..config.extent),
                rng.gen_range(0.0..config.extent),
                rng.gen_range(0.0..MAX_ALTITUDE),
            );
            nodes.push(Node::new(point, level));
        }
    }
    Ok(nodes)
}

/// Builds a count-strategy planner matching the city's layer count.
///
/// # Errors
/// Returns [`BenchSetupError::Hierarchy`] when the default target counts do
/// not fit the city.
pub fn count_planner(config: &CityConfig) -> Result<HierarchyPlanner, BenchSetupError> {
    Ok(HierarchyPlanner::builder()
        .with_layer_count(config.nodes_per_level.len())
        .with_cluster_strategy(ClusterStrategy::Count)
        .build()?)
}

/// Plans the city once and returns its clustered levels, ready to be linked
/// again in isolation.
///
/// # Errors
/// Propagates generation and planning failures.
pub fn clustered_layers(config: &CityConfig) -> Result<Vec<LayerClusters>, BenchSetupError> {
    let nodes = generate(config)?;
    let hierarchy = count_planner(config)?.plan(&nodes)?;
    Ok(hierarchy.layers().to_vec())
}
