//! Unit and property tests for the agglomerative partitioner.

use overlay_test_support::tracing::RecordingLayer;
use proptest::{prelude::*, sample::Index};
use rstest::rstest;
use tracing::Level;

use crate::{
    DistanceMatrix,
    error::OverlayError,
    test_utils::{graph_strategy, matrix, memberships, suite_proptest_config, worked_example},
};

use super::{Linkage, partition};

/// Four nodes where the second merge depends on the linkage criterion.
fn linkage_sensitive() -> DistanceMatrix {
    matrix(
        4,
        &[
            (0, 1, 1.0),
            (0, 2, 2.0),
            (1, 2, 20.0),
            (0, 3, 6.0),
            (1, 3, 7.0),
            (2, 3, 6.8),
        ],
    )
}

#[rstest]
#[case::single(Linkage::Single, vec![vec![3], vec![0, 1, 2]])]
#[case::complete(Linkage::Complete, vec![vec![0, 1], vec![2, 3]])]
#[case::average(Linkage::Average, vec![vec![2], vec![0, 1, 3]])]
fn linkage_selects_the_second_merge(#[case] linkage: Linkage, #[case] expected: Vec<Vec<usize>>) {
    let clusters = partition(&linkage_sensitive(), 2, linkage).expect("connected graph");
    assert_eq!(memberships(&clusters), expected);
}

#[test]
fn complete_linkage_splits_worked_example_into_three_groups() {
    let clusters = partition(&worked_example(), 3, Linkage::Complete).expect("connected graph");
    assert_eq!(
        memberships(&clusters),
        vec![vec![0, 2, 4, 7], vec![3, 8], vec![1, 5, 6, 9]]
    );
}

#[test]
fn single_linkage_chains_worked_example() {
    let clusters = partition(&worked_example(), 3, Linkage::Single).expect("connected graph");
    assert_eq!(
        memberships(&clusters),
        vec![vec![1], vec![8], vec![0, 2, 3, 4, 5, 6, 7, 9]]
    );
}

#[test]
fn equal_linkage_merges_lowest_anchors_first() {
    let tied = matrix(
        4,
        &[
            (0, 1, 1.0),
            (0, 2, 1.0),
            (0, 3, 1.0),
            (1, 2, 1.0),
            (1, 3, 1.0),
            (2, 3, 1.0),
        ],
    );
    let clusters = partition(&tied, 3, Linkage::Single).expect("connected graph");
    assert_eq!(memberships(&clusters), vec![vec![2], vec![3], vec![0, 1]]);
}

#[test]
fn cluster_ids_follow_finalisation_order() {
    let clusters = partition(&worked_example(), 3, Linkage::Complete).expect("connected graph");
    let ids: Vec<usize> = clusters.iter().map(|cluster| cluster.id().get()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn one_cluster_holds_every_node() {
    let clusters = partition(&worked_example(), 1, Linkage::Single).expect("connected graph");
    assert_eq!(memberships(&clusters), vec![(0..10).collect::<Vec<_>>()]);
}

#[test]
fn node_count_clusters_are_singletons() {
    let clusters = partition(&worked_example(), 10, Linkage::Average).expect("no merges needed");
    let expected: Vec<Vec<usize>> = (0..10).map(|node| vec![node]).collect();
    assert_eq!(memberships(&clusters), expected);
}

#[test]
fn singletons_need_no_finite_edges() {
    let isolated = matrix(3, &[]);
    let clusters = partition(&isolated, 3, Linkage::Single).expect("no merges needed");
    assert_eq!(clusters.len(), 3);
}

#[rstest]
#[case::zero(0, OverlayError::InvalidClusterCount { requested: 0 })]
#[case::too_many(5, OverlayError::TooManyClusters { requested: 5, nodes: 4 })]
fn rejects_out_of_range_targets(#[case] target: usize, #[case] expected: OverlayError) {
    let err = partition(&linkage_sensitive(), target, Linkage::Single).expect_err("must fail");
    assert_eq!(err, expected);
}

#[test]
fn rejects_empty_matrix() {
    let empty = DistanceMatrix::from_edges(0, []).expect("empty matrix is constructible");
    let err = partition(&empty, 1, Linkage::Single).expect_err("must fail");
    assert_eq!(err, OverlayError::EmptyGraph);
}

#[test]
fn unreachable_components_stall_with_snapshot() {
    let split = matrix(4, &[(0, 1, 1.0), (2, 3, 1.0)]);
    let (result, layer) = RecordingLayer::capture(|| partition(&split, 1, Linkage::Complete));
    let err = result.expect_err("components cannot merge");
    assert_eq!(
        err,
        OverlayError::UnreachablePartition {
            target: 1,
            clusters: vec![vec![0, 1], vec![2, 3]],
        }
    );
    let warnings =
        layer.events_with_message(Level::WARN, "agglomeration stalled on unreachable cluster pairs");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].fields["remaining"], "2");
}

#[test]
fn partition_span_records_configuration() {
    let (result, layer) = RecordingLayer::capture(|| {
        partition(&linkage_sensitive(), 2, Linkage::Average)
    });
    result.expect("connected graph");
    let fields = layer.span("core.partition").expect("span recorded");
    assert_eq!(fields["nodes"], "4");
    assert_eq!(fields["requested"], "2");
    assert_eq!(fields["linkage"], "Average");
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn partitions_cover_every_node_exactly_once(
        fixture in graph_strategy(14),
        pick in any::<Index>(),
        linkage in prop_oneof![
            Just(Linkage::Single),
            Just(Linkage::Complete),
            Just(Linkage::Average),
        ],
    ) {
        let nodes = fixture.matrix.len();
        let target = pick.index(nodes) + 1;
        let clusters = partition(&fixture.matrix, target, linkage)?;

        prop_assert_eq!(clusters.len(), target);
        let mut seen = vec![false; nodes];
        for (index, cluster) in clusters.iter().enumerate() {
            prop_assert_eq!(cluster.id().get(), index);
            prop_assert!(!cluster.is_empty());
            prop_assert!(cluster.members().windows(2).all(|pair| pair[0] < pair[1]));
            for &member in cluster.members() {
                prop_assert!(!seen[member], "node {} assigned twice", member);
                seen[member] = true;
            }
        }
        prop_assert!(seen.iter().all(|&covered| covered));

        let again = partition(&fixture.matrix, target, linkage)?;
        prop_assert_eq!(clusters, again);
    }
}
