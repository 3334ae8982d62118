//! Overlay construction pipeline.
//!
//! Provides the [`Overlay`] runtime entry point, which runs every stage in
//! order against one distance matrix and bundles the results.

use std::num::NonZeroUsize;

use tracing::{info, instrument, warn};

use crate::{
    Result,
    assemble::assemble_global_tree,
    builder::ExecutionStrategy,
    error::OverlayError,
    matrix::DistanceMatrix,
    mst::{build_intra_trees, connect_clusters},
    neighbours::derive_neighbours,
    partition::{Linkage, partition},
    plan::OverlayPlan,
    representatives::{LeaderPolicy, RootPolicy, select_representatives},
};

/// Entry point for building an overlay from a distance matrix.
///
/// # Examples
/// ```
/// use overlay_core::{DistanceMatrix, OverlayBuilder};
///
/// let matrix = DistanceMatrix::from_edges(
///     4,
///     [(0, 1, 1.0), (2, 3, 1.0), (0, 2, 6.0), (1, 3, 9.0)],
/// )?;
/// let overlay = OverlayBuilder::new().with_cluster_count(2).build()?;
/// let plan = overlay.run(&matrix)?;
/// assert_eq!(plan.clusters().len(), 2);
/// assert_eq!(plan.global_tree().edges().len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Overlay {
    cluster_count: NonZeroUsize,
    linkage: Linkage,
    root_policy: RootPolicy,
    leader_policy: LeaderPolicy,
    execution_strategy: ExecutionStrategy,
}

impl Overlay {
    pub(crate) fn new(
        cluster_count: NonZeroUsize,
        linkage: Linkage,
        root_policy: RootPolicy,
        leader_policy: LeaderPolicy,
        execution_strategy: ExecutionStrategy,
    ) -> Self {
        Self {
            cluster_count,
            linkage,
            root_policy,
            leader_policy,
            execution_strategy,
        }
    }

    /// Returns the number of clusters the overlay partitions into.
    #[rustfmt::skip]
    #[must_use]
    pub fn cluster_count(&self) -> NonZeroUsize { self.cluster_count }

    /// Returns the linkage criterion.
    #[rustfmt::skip]
    #[must_use]
    pub fn linkage(&self) -> Linkage { self.linkage }

    /// Returns the root policy.
    #[rustfmt::skip]
    #[must_use]
    pub fn root_policy(&self) -> RootPolicy { self.root_policy }

    /// Returns the leader policy.
    #[rustfmt::skip]
    #[must_use]
    pub fn leader_policy(&self) -> LeaderPolicy { self.leader_policy }

    /// Returns the execution strategy for the per-cluster tree builds.
    #[rustfmt::skip]
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy { self.execution_strategy }

    /// Runs every stage against `matrix` and returns the resulting plan.
    ///
    /// Any stage failure aborts the run; no partial plan is returned.
    ///
    /// # Errors
    /// Returns [`OverlayError::EmptyGraph`] for an empty matrix,
    /// [`OverlayError::TooManyClusters`] when the cluster count exceeds the
    /// node count, [`OverlayError::BackendUnavailable`] when the execution
    /// strategy cannot run in this build, and any stage failure:
    /// [`OverlayError::UnreachablePartition`],
    /// [`OverlayError::DisconnectedSubgraph`] or
    /// [`OverlayError::InternalConsistency`].
    #[instrument(
        name = "core.run",
        err,
        skip_all,
        fields(
            nodes = matrix.len(),
            edges = matrix.edge_count(),
            clusters = self.cluster_count.get(),
            linkage = ?self.linkage,
            strategy = ?self.execution_strategy,
        ),
    )]
    pub fn run(&self, matrix: &DistanceMatrix) -> Result<OverlayPlan> {
        let nodes = matrix.len();
        if nodes == 0 {
            return Err(OverlayError::EmptyGraph);
        }
        let requested = self.cluster_count.get();
        if requested > nodes {
            return Err(OverlayError::TooManyClusters { requested, nodes });
        }
        if !self.execution_strategy.is_available() {
            warn!(
                requested = ?self.execution_strategy,
                "execution strategy is not compiled into this build"
            );
            return Err(OverlayError::BackendUnavailable {
                requested: self.execution_strategy,
            });
        }

        let clusters = partition(matrix, requested, self.linkage)?;
        let representatives =
            select_representatives(matrix, &clusters, self.root_policy, self.leader_policy);
        let intra_trees =
            build_intra_trees(matrix, &clusters, &representatives, self.execution_strategy)?;
        let inter_tree = connect_clusters(matrix, &representatives)?;
        let global_tree = assemble_global_tree(nodes, &intra_trees, &inter_tree)?;
        let neighbours = derive_neighbours(&global_tree);

        info!(
            clusters = clusters.len(),
            tree_weight = global_tree.total_weight(),
            "overlay plan completed"
        );
        Ok(OverlayPlan::new(
            clusters,
            representatives,
            intra_trees,
            inter_tree,
            global_tree,
            neighbours,
        ))
    }
}
