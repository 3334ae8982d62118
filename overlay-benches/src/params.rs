//! Benchmark parameter types.
//!
//! Each type renders as a compact Criterion benchmark id.

use std::fmt;

use overlay_core::{ExecutionStrategy, Linkage};

/// Parameters for an end-to-end pipeline benchmark run.
#[derive(Clone, Debug)]
pub struct PipelineBenchParams {
    /// Number of nodes in the generated graph.
    pub node_count: usize,
    /// Number of clusters requested.
    pub clusters: usize,
    /// How the per-cluster trees are scheduled.
    pub strategy: ExecutionStrategy,
}

impl fmt::Display for PipelineBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},k={},{:?}",
            self.node_count, self.clusters, self.strategy
        )
    }
}

/// Parameters for a partitioner benchmark run.
#[derive(Clone, Debug)]
pub struct PartitionBenchParams {
    /// Number of nodes in the generated graph.
    pub node_count: usize,
    /// Linkage criterion under test.
    pub linkage: Linkage,
}

impl fmt::Display for PartitionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},{:?}", self.node_count, self.linkage)
    }
}
