//! Shared test utilities for `overlay-core`.

use overlay_test_support::{ci::property_test_profile::ProptestRunProfile, fixtures};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::matrix::DistanceMatrix;

/// Builds a proptest configuration from the shared CI profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// The ten-node worked example as a [`DistanceMatrix`].
pub(crate) fn worked_example() -> DistanceMatrix {
    DistanceMatrix::from_dense(&fixtures::worked_example_rows())
        .expect("worked example must be a valid matrix")
}

/// Builds a matrix from edges, panicking on invalid input.
pub(crate) fn matrix(node_count: usize, edges: &[(usize, usize, f32)]) -> DistanceMatrix {
    DistanceMatrix::from_edges(node_count, edges.iter().copied())
        .expect("test edges must form a valid matrix")
}

/// Collects cluster memberships for compact assertions.
pub(crate) fn memberships(clusters: &[crate::Cluster]) -> Vec<Vec<usize>> {
    clusters
        .iter()
        .map(|cluster| cluster.members().to_vec())
        .collect()
}

/// Topology family used by the property suites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, test_strategy::Arbitrary)]
pub(crate) enum GraphShape {
    /// Every pair reachable with distinct-ish continuous weights.
    Complete,
    /// Every pair reachable with weights drawn from three values.
    Tied,
    /// A random spanning path plus a few extra chords.
    Sparse,
}

impl GraphShape {
    /// Returns `true` when every pair of nodes has a direct entry.
    pub(crate) fn is_complete(self) -> bool {
        matches!(self, Self::Complete | Self::Tied)
    }
}

/// Generated graph with the parameters that produced it.
#[derive(Clone, Debug)]
pub(crate) struct GraphFixture {
    pub shape: GraphShape,
    pub matrix: DistanceMatrix,
}

/// Strategy producing connected graphs of `1..=max_nodes` nodes.
pub(crate) fn graph_strategy(max_nodes: usize) -> impl Strategy<Value = GraphFixture> {
    (any::<GraphShape>(), 1..=max_nodes, any::<u64>())
        .prop_map(|(shape, nodes, seed)| seeded_graph(shape, nodes, seed))
}

/// Deterministically generates a connected graph of the given shape.
pub(crate) fn seeded_graph(shape: GraphShape, nodes: usize, seed: u64) -> GraphFixture {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    match shape {
        GraphShape::Complete | GraphShape::Tied => {
            for left in 0..nodes {
                for right in left + 1..nodes {
                    let weight = if shape == GraphShape::Tied {
                        f32::from(rng.gen_range(1_u8..=3))
                    } else {
                        rng.gen_range(1.0_f32..100.0)
                    };
                    edges.push((left, right, weight));
                }
            }
        }
        GraphShape::Sparse => {
            let mut order: Vec<usize> = (0..nodes).collect();
            order.shuffle(&mut rng);
            for pair in order.windows(2) {
                edges.push((pair[0], pair[1], rng.gen_range(1.0_f32..50.0)));
            }
            for _ in 0..nodes / 2 {
                let left = rng.gen_range(0..nodes);
                let right = rng.gen_range(0..nodes);
                let known = edges
                    .iter()
                    .any(|&(a, b, _)| (a.min(b), a.max(b)) == (left.min(right), left.max(right)));
                if left != right && !known {
                    edges.push((left, right, rng.gen_range(1.0_f32..50.0)));
                }
            }
        }
    }
    GraphFixture {
        shape,
        matrix: matrix(nodes, &edges),
    }
}
