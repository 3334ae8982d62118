//! Immutable bundle of every stage output from one overlay run.

use crate::{
    assemble::GlobalTree,
    cluster::{Cluster, ClusterId},
    mst::SpanningTree,
    neighbours::NeighbourTable,
    representatives::Representatives,
};

/// Result of [`crate::Overlay::run`].
///
/// The per-cluster vectors (`clusters`, `representatives`, `intra_trees`)
/// share one index: position `i` describes cluster `ClusterId::new(i)`.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayPlan {
    clusters: Vec<Cluster>,
    representatives: Vec<Representatives>,
    intra_trees: Vec<SpanningTree>,
    inter_tree: SpanningTree,
    global_tree: GlobalTree,
    neighbours: NeighbourTable,
    assignments: Vec<ClusterId>,
}

impl OverlayPlan {
    pub(crate) fn new(
        clusters: Vec<Cluster>,
        representatives: Vec<Representatives>,
        intra_trees: Vec<SpanningTree>,
        inter_tree: SpanningTree,
        global_tree: GlobalTree,
        neighbours: NeighbourTable,
    ) -> Self {
        let mut assignments = vec![ClusterId::new(0); global_tree.node_count()];
        for cluster in &clusters {
            for &member in cluster.members() {
                if let Some(slot) = assignments.get_mut(member) {
                    *slot = cluster.id();
                }
            }
        }
        Self {
            clusters,
            representatives,
            intra_trees,
            inter_tree,
            global_tree,
            neighbours,
            assignments,
        }
    }

    /// Returns the clusters in id order.
    #[rustfmt::skip]
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] { &self.clusters }

    /// Returns the leader and root of every cluster, in cluster order.
    #[rustfmt::skip]
    #[must_use]
    pub fn representatives(&self) -> &[Representatives] { &self.representatives }

    /// Returns the spanning tree of every cluster, in cluster order.
    #[rustfmt::skip]
    #[must_use]
    pub fn intra_trees(&self) -> &[SpanningTree] { &self.intra_trees }

    /// Returns the spanning tree over the cluster roots.
    #[rustfmt::skip]
    #[must_use]
    pub fn inter_tree(&self) -> &SpanningTree { &self.inter_tree }

    /// Returns the spanning tree over every node.
    #[rustfmt::skip]
    #[must_use]
    pub fn global_tree(&self) -> &GlobalTree { &self.global_tree }

    /// Returns the overlay neighbours of every node.
    #[rustfmt::skip]
    #[must_use]
    pub fn neighbours(&self) -> &NeighbourTable { &self.neighbours }

    /// Returns the number of nodes covered by the plan.
    #[rustfmt::skip]
    #[must_use]
    pub fn node_count(&self) -> usize { self.assignments.len() }

    /// Returns the cluster `node` belongs to, or `None` when `node` is out of
    /// range.
    #[must_use]
    pub fn cluster_of(&self, node: usize) -> Option<ClusterId> {
        self.assignments.get(node).copied()
    }

    /// Returns the representatives of cluster `id`.
    #[must_use]
    pub fn representatives_of(&self, id: ClusterId) -> Option<&Representatives> {
        self.representatives.get(id.get())
    }
}
