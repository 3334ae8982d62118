//! Global tree assembly and verification.
//!
//! The per-cluster trees and the tree over the cluster roots are disjoint
//! edge sets by construction. Their union is checked here before anything
//! downstream relies on it being a spanning tree of the whole graph.

use tracing::{error, info, instrument};

use crate::{
    Result,
    error::OverlayError,
    mst::{SpanningTree, TreeEdge, union_find::DisjointSet},
};

/// Spanning tree over every node, with edges in [`TreeEdge`] order.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalTree {
    node_count: usize,
    edges: Vec<TreeEdge>,
}

impl GlobalTree {
    /// Returns the number of nodes the tree spans.
    #[rustfmt::skip]
    #[must_use]
    pub fn node_count(&self) -> usize { self.node_count }

    /// Returns the edges sorted by `(weight, source, target)`.
    #[rustfmt::skip]
    #[must_use]
    pub fn edges(&self) -> &[TreeEdge] { &self.edges }

    /// Returns the sum of the edge weights, accumulated in `f64`.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|edge| f64::from(edge.weight())).sum()
    }
}

/// Unions the intra-cluster trees with the inter-cluster tree and verifies
/// the result spans `node_count` nodes as a single tree.
///
/// # Errors
/// Returns [`OverlayError::InternalConsistency`] naming the first violated
/// invariant: the edge count is not `node_count - 1`, an endpoint is out of
/// range, an edge closes a cycle, or the edges leave more than one component.
///
/// # Examples
/// ```
/// use overlay_core::{
///     Cluster, ClusterId, DistanceMatrix, Representatives, assemble_global_tree,
///     build_cluster_tree, connect_clusters,
/// };
///
/// let matrix = DistanceMatrix::from_edges(3, [(0, 1, 1.0), (1, 2, 4.0)])?;
/// let left = Cluster::new(ClusterId::new(0), vec![0, 1]).expect("non-empty");
/// let right = Cluster::new(ClusterId::new(1), vec![2]).expect("non-empty");
/// let intra = vec![
///     build_cluster_tree(&matrix, &left, 1)?,
///     build_cluster_tree(&matrix, &right, 2)?,
/// ];
/// let roots = [
///     Representatives::new(left.id(), 0, 1),
///     Representatives::new(right.id(), 2, 2),
/// ];
/// let inter = connect_clusters(&matrix, &roots)?;
/// let global = assemble_global_tree(matrix.len(), &intra, &inter)?;
/// assert_eq!(global.edges().len(), 2);
/// assert_eq!(global.total_weight(), 5.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.assemble_global_tree",
    err,
    skip_all,
    fields(nodes = node_count, intra_trees = intra.len()),
)]
pub fn assemble_global_tree(
    node_count: usize,
    intra: &[SpanningTree],
    inter: &SpanningTree,
) -> Result<GlobalTree> {
    let mut edges: Vec<TreeEdge> = intra
        .iter()
        .chain(std::iter::once(inter))
        .flat_map(|tree| tree.edges().iter().copied())
        .collect();
    edges.sort_unstable();

    verify_tree(node_count, &edges).inspect_err(|failure| {
        error!(error = %failure, "assembled overlay is not a spanning tree");
    })?;

    info!(edges = edges.len(), "global tree assembled");
    Ok(GlobalTree { node_count, edges })
}

fn verify_tree(node_count: usize, edges: &[TreeEdge]) -> Result<()> {
    let violation = |invariant: &'static str| OverlayError::InternalConsistency {
        invariant,
        edges: edges.len(),
        nodes: node_count,
    };

    if node_count == 0 || edges.len() != node_count - 1 {
        return Err(violation("edge count equals node count minus one"));
    }
    if edges.iter().any(|edge| edge.target() >= node_count) {
        return Err(violation("edge endpoints lie within the node range"));
    }

    let mut components = DisjointSet::new(node_count);
    for edge in edges {
        if !components.union(edge.source(), edge.target()) {
            return Err(violation("edges form no cycle"));
        }
    }
    if components.components() != 1 {
        return Err(violation("edges connect every node"));
    }
    Ok(())
}
