//! Seeded random latency graphs for benchmarking.
//!
//! Every generated graph is connected: a random recursive tree links each
//! node to an earlier one, then extra links are sprinkled over the remaining
//! pairs with the configured density. Latencies are whole milliseconds so
//! reruns with the same seed produce bit-identical matrices.

use std::collections::BTreeMap;

use overlay_core::DistanceMatrix;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

const MIN_LATENCY_MS: u16 = 1;
const MAX_LATENCY_MS: u16 = 250;

/// Errors that may occur during latency graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum GraphError {
    /// The requested node count was zero.
    #[error("node count must be greater than zero")]
    ZeroNodes,
    /// The link density was outside `0.0..=1.0`.
    #[error("link density must lie in 0.0..=1.0 (got {density})")]
    InvalidDensity {
        /// The rejected density.
        density: f64,
    },
}

/// Configuration for latency graph generation.
#[derive(Clone, Debug)]
pub struct LatencyGraphConfig {
    /// Number of nodes to generate.
    pub node_count: usize,
    /// Probability that a pair outside the backbone tree is linked.
    pub density: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a connected latency graph.
///
/// # Errors
/// Returns [`BenchSetupError::Graph`] for an empty graph or an out-of-range
/// density.
///
/// # Examples
/// ```
/// use overlay_benches::graph::{LatencyGraphConfig, generate};
///
/// let config = LatencyGraphConfig { node_count: 20, density: 0.1, seed: 7 };
/// let matrix = generate(&config).expect("valid config");
/// assert_eq!(matrix.len(), 20);
/// assert!(matrix.edge_count() >= 19);
/// ```
pub fn generate(config: &LatencyGraphConfig) -> Result<DistanceMatrix, BenchSetupError> {
    let links = generate_links(config)?;
    let matrix = DistanceMatrix::from_edges(
        config.node_count,
        links
            .into_iter()
            .map(|((left, right), latency)| (left, right, latency)),
    )?;
    Ok(matrix)
}

fn generate_links(config: &LatencyGraphConfig) -> Result<BTreeMap<(usize, usize), f32>, GraphError> {
    if config.node_count == 0 {
        return Err(GraphError::ZeroNodes);
    }
    if !(0.0..=1.0).contains(&config.density) {
        return Err(GraphError::InvalidDensity {
            density: config.density,
        });
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut links = BTreeMap::new();
    for node in 1..config.node_count {
        let parent = rng.gen_range(0..node);
        links.insert((parent, node), latency(&mut rng));
    }
    for left in 0..config.node_count {
        for right in left.saturating_add(1)..config.node_count {
            if rng.gen_bool(config.density) {
                let sampled = latency(&mut rng);
                links.entry((left, right)).or_insert(sampled);
            }
        }
    }
    Ok(links)
}

fn latency(rng: &mut SmallRng) -> f32 {
    f32::from(rng.gen_range(MIN_LATENCY_MS..=MAX_LATENCY_MS))
}

#[cfg(test)]
mod tests {
    use overlay_core::OverlayBuilder;
    use rstest::rstest;

    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn config(node_count: usize, density: f64, seed: u64) -> LatencyGraphConfig {
        LatencyGraphConfig {
            node_count,
            density,
            seed,
        }
    }

    #[rstest]
    #[case::sparse(50, 0.0)]
    #[case::dense(30, 1.0)]
    #[case::single(1, 0.5)]
    fn generated_graphs_are_connected(
        #[case] node_count: usize,
        #[case] density: f64,
    ) -> TestResult {
        let matrix = generate(&config(node_count, density, 11))?;
        let plan = OverlayBuilder::new().build()?.run(&matrix)?;
        assert_eq!(plan.global_tree().edges().len(), node_count - 1);
        Ok(())
    }

    #[test]
    fn complete_density_links_every_pair() {
        let links = generate_links(&config(12, 1.0, 3)).expect("valid config");
        assert_eq!(links.len(), 66);
    }

    #[test]
    fn seeds_are_reproducible() {
        let first = generate_links(&config(40, 0.2, 99)).expect("valid config");
        let second = generate_links(&config(40, 0.2, 99)).expect("valid config");
        let other = generate_links(&config(40, 0.2, 100)).expect("valid config");
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn latencies_stay_in_range() {
        let links = generate_links(&config(25, 0.5, 5)).expect("valid config");
        assert!(links.values().all(|&latency| (1.0..=250.0).contains(&latency)));
    }

    #[rstest]
    #[case::empty(config(0, 0.5, 1), GraphError::ZeroNodes)]
    #[case::negative(config(4, -0.1, 1), GraphError::InvalidDensity { density: -0.1 })]
    #[case::above_one(config(4, 1.5, 1), GraphError::InvalidDensity { density: 1.5 })]
    fn invalid_configs_are_rejected(#[case] input: LatencyGraphConfig, #[case] expected: GraphError) {
        assert_eq!(generate_links(&input), Err(expected));
    }
}
