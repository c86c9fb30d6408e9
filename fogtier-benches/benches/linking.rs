//! Inter-layer linking benchmarks.
//!
//! Plans a synthetic city once, then measures the complete-link parent
//! assignment alone so clustering cost does not mask the linker.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use fogtier_benches::{
    city::{CityConfig, clustered_layers},
    error::BenchSetupError,
    params::LinkBenchParams,
};
use fogtier_core::{Euclidean, ExecutionStrategy, Linker};

/// Seed used for all synthetic cities in this benchmark.
const SEED: u64 = 42;

/// Side length of the city square.
const EXTENT: f64 = 10_000.0;

/// Edge-level node counts to benchmark.
const EDGE_NODES: &[usize] = &[250, 1_000];

const STRATEGIES: &[ExecutionStrategy] = &[ExecutionStrategy::Sequential, ExecutionStrategy::Auto];

fn link_layers_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("link_layers");
    group.sample_size(20);

    for &edge_nodes in EDGE_NODES {
        let layers = clustered_layers(&CityConfig::tapered(edge_nodes, EXTENT, SEED))?;
        for &strategy in STRATEGIES {
            let linker = Linker::new().with_execution_strategy(strategy);
            let params = LinkBenchParams {
                edge_nodes,
                strategy,
            };
            group.bench_with_input(
                BenchmarkId::from_parameter(&params),
                &layers,
                |b, layers| {
                    b.iter(|| linker.link(layers, &Euclidean));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn link_layers(c: &mut Criterion) {
    if let Err(err) = link_layers_impl(c) {
        panic!("link_layers benchmark setup failed: {err}");
    }
}

criterion_group!(benches, link_layers);
criterion_main!(benches);
