//! Benchmark parameter types rendered into Criterion benchmark ids.

use std::fmt;

use fogtier_core::ExecutionStrategy;

/// Parameters for a clustering or planning benchmark run.
#[derive(Clone, Debug)]
pub struct CityBenchParams {
    /// Number of nodes on the lowest level.
    pub edge_nodes: usize,
}

impl fmt::Display for CityBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge={}", self.edge_nodes)
    }
}

/// Parameters for a linking benchmark run.
#[derive(Clone, Debug)]
pub struct LinkBenchParams {
    /// Number of nodes on the lowest level.
    pub edge_nodes: usize,
    /// Linker execution backend.
    pub strategy: ExecutionStrategy,
}

impl fmt::Display for LinkBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge={},{:?}", self.edge_nodes, self.strategy)
    }
}
