//! Property runners shared by the proptest and rstest drivers.

use proptest::{
    prop_assert, prop_assert_eq,
    test_runner::{TestCaseError, TestCaseResult},
};

use crate::{
    cluster::{Cluster, ClusterId},
    error::{OverlayError, TreeScope},
    mst::{SpanningTree, build_cluster_tree, union_find::DisjointSet},
    test_utils::GraphFixture,
};

use super::oracle::{ORACLE_MAX_NODES, brute_force_subset_weight, brute_force_weight};

/// Relative tolerance when comparing totals summed in different orders.
const WEIGHT_TOLERANCE: f64 = 1e-9;

fn whole_graph(fixture: &GraphFixture) -> Cluster {
    Cluster::new(ClusterId::new(0), (0..fixture.matrix.len()).collect())
        .unwrap_or_else(|| panic!("fixture {:?} has no nodes", fixture.shape))
}

fn grow(fixture: &GraphFixture, seed: usize) -> Result<SpanningTree, TestCaseError> {
    build_cluster_tree(&fixture.matrix, &whole_graph(fixture), seed).map_err(|error| {
        TestCaseError::fail(format!(
            "tree build failed: {error} (shape={:?}, nodes={})",
            fixture.shape,
            fixture.matrix.len(),
        ))
    })
}

fn close(left: f64, right: f64) -> bool {
    (left - right).abs() <= WEIGHT_TOLERANCE * left.abs().max(right.abs()).max(1.0)
}

/// The tree is exactly as light as the lightest spanning tree.
pub(super) fn run_oracle_property(fixture: &GraphFixture) -> TestCaseResult {
    if fixture.matrix.len() > ORACLE_MAX_NODES {
        return Ok(());
    }
    let tree = grow(fixture, 0)?;
    let expected = brute_force_weight(&fixture.matrix)
        .ok_or_else(|| TestCaseError::fail("fixture graph must be connected"))?;
    prop_assert!(
        close(tree.total_weight(), expected),
        "prim weight {} differs from oracle {} ({:?})",
        tree.total_weight(),
        expected,
        fixture.shape,
    );
    Ok(())
}

/// The edge set spans every vertex once, without cycles, over real entries.
pub(super) fn run_structural_property(fixture: &GraphFixture) -> TestCaseResult {
    let nodes = fixture.matrix.len();
    let tree = grow(fixture, nodes / 2)?;
    prop_assert_eq!(tree.edges().len(), nodes - 1);

    let mut set = DisjointSet::new(nodes);
    for edge in tree.edges() {
        prop_assert!(edge.source() < edge.target(), "edge {:?} is not canonical", edge);
        prop_assert_eq!(
            fixture.matrix.distance(edge.source(), edge.target()),
            Some(edge.weight())
        );
        prop_assert!(set.union(edge.source(), edge.target()), "edge {:?} closes a cycle", edge);
    }
    prop_assert_eq!(set.components(), 1);
    Ok(())
}

/// Every seed yields a tree of the same total weight.
pub(super) fn run_seed_independence_property(fixture: &GraphFixture) -> TestCaseResult {
    let reference = grow(fixture, 0)?.total_weight();
    for seed in 1..fixture.matrix.len() {
        let total = grow(fixture, seed)?.total_weight();
        prop_assert!(
            close(total, reference),
            "seed {} weighs {} but seed 0 weighs {}",
            seed,
            total,
            reference,
        );
    }
    Ok(())
}

/// A tree over the members selected by `mask` is as light as the lightest
/// spanning tree of their induced subgraph, and fails exactly when that
/// subgraph is disconnected. `root_slot` picks the seed among the members,
/// clamped to the last one.
pub(super) fn run_subset_oracle_property(
    fixture: &GraphFixture,
    mask: u16,
    root_slot: usize,
) -> TestCaseResult {
    let members: Vec<usize> = (0..fixture.matrix.len())
        .filter(|&node| (mask >> node) & 1 == 1)
        .take(ORACLE_MAX_NODES)
        .collect();
    let Some(cluster) = Cluster::new(ClusterId::new(3), members) else {
        return Ok(());
    };
    let root = cluster.members()[root_slot.min(cluster.len() - 1)];
    let expected = brute_force_subset_weight(&fixture.matrix, cluster.members());

    match (build_cluster_tree(&fixture.matrix, &cluster, root), expected) {
        (Ok(tree), Some(weight)) => {
            prop_assert_eq!(tree.edges().len(), cluster.len() - 1);
            prop_assert_eq!(tree.vertices(), cluster.members());
            for edge in tree.edges() {
                prop_assert!(
                    cluster.contains(edge.source()) && cluster.contains(edge.target()),
                    "edge {:?} leaves members {:?}",
                    edge,
                    cluster.members(),
                );
            }
            prop_assert!(
                close(tree.total_weight(), weight),
                "subset tree weighs {} but the oracle found {} (members {:?})",
                tree.total_weight(),
                weight,
                cluster.members(),
            );
        }
        (
            Err(OverlayError::DisconnectedSubgraph {
                scope,
                unreachable,
                partial,
            }),
            None,
        ) => {
            prop_assert_eq!(scope, TreeScope::Cluster(cluster.id()));
            prop_assert!(cluster.contains(unreachable) && unreachable != root);
            prop_assert!(partial.len() < cluster.len() - 1);
        }
        (outcome, oracle) => {
            return Err(TestCaseError::fail(format!(
                "tree build {outcome:?} disagrees with oracle {oracle:?} (members {:?})",
                cluster.members(),
            )));
        }
    }
    Ok(())
}
