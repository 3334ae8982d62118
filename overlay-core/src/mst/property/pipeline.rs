//! Whole-pipeline tree invariants.
//!
//! Runs [`Overlay::run`](crate::Overlay::run) on generated graphs and checks
//! every layer of trees in the resulting plan, plus the neighbour projection.

use proptest::{
    prop_assert, prop_assert_eq,
    test_runner::{TestCaseError, TestCaseResult},
};

use crate::{
    ExecutionStrategy, LeaderPolicy, Linkage, OverlayBuilder, OverlayError, OverlayPlan,
    RootPolicy, TreeScope, mst::union_find::DisjointSet, test_utils::GraphFixture,
};

/// Configuration drawn for one pipeline run.
#[derive(Clone, Copy, Debug)]
pub(super) struct PipelineCase {
    pub clusters: usize,
    pub linkage: Linkage,
    pub root_policy: RootPolicy,
    pub leader_policy: LeaderPolicy,
}

fn run_with(
    fixture: &GraphFixture,
    case: PipelineCase,
    strategy: ExecutionStrategy,
) -> Result<Result<OverlayPlan, OverlayError>, TestCaseError> {
    let overlay = OverlayBuilder::new()
        .with_cluster_count(case.clusters)
        .with_linkage(case.linkage)
        .with_root_policy(case.root_policy)
        .with_leader_policy(case.leader_policy)
        .with_execution_strategy(strategy)
        .build()
        .map_err(|error| TestCaseError::fail(format!("{case:?} rejected: {error}")))?;
    Ok(overlay.run(&fixture.matrix))
}

/// Successful runs satisfy every tree invariant; the only tolerated failure
/// is a root set without finite links, which dense graphs never produce.
/// Sequential and fanned-out runs agree.
pub(super) fn run_pipeline_property(fixture: &GraphFixture, case: PipelineCase) -> TestCaseResult {
    let sequential = run_with(fixture, case, ExecutionStrategy::Sequential)?;
    let fanned_out = run_with(fixture, case, ExecutionStrategy::Auto)?;
    prop_assert_eq!(&sequential, &fanned_out);

    match sequential {
        Ok(plan) => check_plan(fixture, case, &plan),
        Err(error) => {
            prop_assert!(
                !fixture.shape.is_complete(),
                "{:?} graph failed with {} under {:?}",
                fixture.shape,
                error,
                case,
            );
            prop_assert!(
                matches!(
                    error,
                    OverlayError::DisconnectedSubgraph {
                        scope: TreeScope::Roots,
                        ..
                    }
                ),
                "unexpected failure {} under {:?}",
                error,
                case,
            );
            Ok(())
        }
    }
}

fn check_plan(fixture: &GraphFixture, case: PipelineCase, plan: &OverlayPlan) -> TestCaseResult {
    let nodes = fixture.matrix.len();
    prop_assert_eq!(plan.node_count(), nodes);
    prop_assert_eq!(plan.clusters().len(), case.clusters);
    prop_assert_eq!(plan.intra_trees().len(), case.clusters);
    for (cluster, tree) in plan.clusters().iter().zip(plan.intra_trees()) {
        prop_assert_eq!(tree.edges().len(), cluster.len() - 1);
        prop_assert_eq!(tree.vertices(), cluster.members());
    }
    prop_assert_eq!(plan.inter_tree().edges().len(), case.clusters - 1);

    let global = plan.global_tree();
    prop_assert_eq!(global.edges().len(), nodes - 1);
    let mut set = DisjointSet::new(nodes);
    for edge in global.edges() {
        prop_assert!(set.union(edge.source(), edge.target()), "edge {:?} closes a cycle", edge);
    }
    prop_assert_eq!(set.components(), 1);

    let table = plan.neighbours();
    prop_assert_eq!(table.len(), nodes);
    let mut appearances = vec![0_usize; global.edges().len()];
    for (node, list) in table.iter() {
        prop_assert!(
            list.windows(2).all(|pair| {
                pair[0]
                    .weight()
                    .total_cmp(&pair[1].weight())
                    .then_with(|| pair[0].node().cmp(&pair[1].node()))
                    .is_lt()
            }),
            "neighbours of {} are out of order: {:?}",
            node,
            list,
        );
        for entry in list {
            let position = global.edges().iter().position(|edge| {
                edge.other(node) == Some(entry.node())
                    && edge.weight().total_cmp(&entry.weight()).is_eq()
            });
            let Some(position) = position else {
                return Err(TestCaseError::fail(format!(
                    "neighbour {entry:?} of {node} is not a global tree edge"
                )));
            };
            appearances[position] += 1;
        }
    }
    prop_assert!(
        appearances.iter().all(|&count| count == 2),
        "edge appearances {:?}",
        appearances,
    );
    Ok(())
}
