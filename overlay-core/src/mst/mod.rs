//! Minimum spanning tree construction over subsets of the distance matrix.
//!
//! Trees are grown with Prim's algorithm from a chosen seed, considering only
//! the finite entries between vertices of the subset. One tree is built per
//! cluster (seeded at the cluster root) and one over the cluster roots, which
//! joins the per-cluster trees into a single overlay.

mod prim;
pub(crate) mod union_find;

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::{
    Result,
    builder::ExecutionStrategy,
    cluster::Cluster,
    error::{OverlayError, TreeScope},
    matrix::DistanceMatrix,
    representatives::Representatives,
};

/// An undirected tree edge in canonical form (`source < target`).
///
/// Edges order by `(weight, source, target)` with [`f32::total_cmp`].
///
/// # Examples
/// ```
/// use overlay_core::TreeEdge;
///
/// let edge = TreeEdge::new(7, 0, 10.0);
/// assert_eq!((edge.source(), edge.target()), (0, 7));
/// assert_eq!(edge.other(7), Some(0));
/// assert!(TreeEdge::new(3, 4, 1.0) < edge);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TreeEdge {
    source: usize,
    target: usize,
    weight: f32,
}

impl TreeEdge {
    /// Creates an edge, swapping the endpoints into canonical order.
    #[must_use]
    pub fn new(left: usize, right: usize, weight: f32) -> Self {
        Self {
            source: left.min(right),
            target: left.max(right),
            weight,
        }
    }

    /// Returns the smaller endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Returns the larger endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f32 { self.weight }

    /// Returns the endpoint opposite `node`, or `None` when `node` is not an
    /// endpoint.
    #[must_use]
    pub fn other(&self, node: usize) -> Option<usize> {
        if node == self.source {
            Some(self.target)
        } else if node == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}

impl PartialEq for TreeEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TreeEdge {}

impl Ord for TreeEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.source.cmp(&other.source))
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl PartialOrd for TreeEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A spanning tree over a vertex subset, with edges in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanningTree {
    root: usize,
    vertices: Vec<usize>,
    edges: Vec<TreeEdge>,
}

impl SpanningTree {
    /// Returns the seed the tree was grown from.
    #[must_use]
    #[rustfmt::skip]
    pub fn root(&self) -> usize { self.root }

    /// Returns the spanned vertices in ascending order.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertices(&self) -> &[usize] { &self.vertices }

    /// Returns the edges in the order Prim's algorithm accepted them.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[TreeEdge] { &self.edges }

    /// Returns the sum of the edge weights, accumulated in `f64`.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|edge| f64::from(edge.weight)).sum()
    }
}

/// Builds the minimum spanning tree of `cluster`, seeded at `root`.
///
/// # Errors
/// Returns [`OverlayError::DisconnectedSubgraph`] when some member cannot be
/// reached over finite in-cluster distances, and
/// [`OverlayError::InternalConsistency`] when `root` is not a member.
///
/// # Examples
/// ```
/// use overlay_core::{Cluster, ClusterId, DistanceMatrix, build_cluster_tree};
///
/// let matrix = DistanceMatrix::from_edges(
///     3,
///     [(0, 1, 4.0), (1, 2, 1.0), (0, 2, 2.0)],
/// )?;
/// let cluster = Cluster::new(ClusterId::new(0), vec![0, 1, 2]).expect("non-empty");
/// let tree = build_cluster_tree(&matrix, &cluster, 0)?;
/// assert_eq!(tree.edges().len(), 2);
/// assert_eq!(tree.total_weight(), 3.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build_cluster_tree(
    matrix: &DistanceMatrix,
    cluster: &Cluster,
    root: usize,
) -> Result<SpanningTree> {
    let tree = prim::grow(matrix, cluster.members(), root, TreeScope::Cluster(cluster.id()))?;
    debug!(
        cluster = %cluster.id(),
        root,
        edges = tree.edges.len(),
        "cluster tree built"
    );
    Ok(tree)
}

/// Builds one spanning tree per cluster, returned in cluster order.
///
/// `representatives` must hold one entry per cluster, in the same order.
///
/// # Errors
/// Returns the failure of any cluster tree (see [`build_cluster_tree`]),
/// [`OverlayError::BackendUnavailable`] when [`ExecutionStrategy::Parallel`]
/// is requested without the `parallel` feature, and
/// [`OverlayError::InternalConsistency`] when the inputs do not line up.
#[instrument(
    name = "core.build_intra_trees",
    err,
    skip_all,
    fields(clusters = clusters.len(), strategy = ?strategy),
)]
pub fn build_intra_trees(
    matrix: &DistanceMatrix,
    clusters: &[Cluster],
    representatives: &[Representatives],
    strategy: ExecutionStrategy,
) -> Result<Vec<SpanningTree>> {
    let aligned = clusters.len() == representatives.len()
        && clusters
            .iter()
            .zip(representatives)
            .all(|(cluster, chosen)| cluster.id() == chosen.cluster());
    if !aligned {
        return Err(OverlayError::InternalConsistency {
            invariant: "one representative set per cluster, in cluster order",
            edges: 0,
            nodes: matrix.len(),
        });
    }

    let trees = match strategy {
        ExecutionStrategy::Sequential => build_sequential(matrix, clusters, representatives)?,
        ExecutionStrategy::Parallel | ExecutionStrategy::Auto => {
            build_fanned_out(matrix, clusters, representatives, strategy)?
        }
    };
    info!(
        trees = trees.len(),
        edges = trees.iter().map(|tree| tree.edges.len()).sum::<usize>(),
        "intra-cluster trees built"
    );
    Ok(trees)
}

fn build_sequential(
    matrix: &DistanceMatrix,
    clusters: &[Cluster],
    representatives: &[Representatives],
) -> Result<Vec<SpanningTree>> {
    clusters
        .iter()
        .zip(representatives)
        .map(|(cluster, chosen)| build_cluster_tree(matrix, cluster, chosen.root()))
        .collect()
}

#[cfg(feature = "parallel")]
fn build_fanned_out(
    matrix: &DistanceMatrix,
    clusters: &[Cluster],
    representatives: &[Representatives],
    _strategy: ExecutionStrategy,
) -> Result<Vec<SpanningTree>> {
    clusters
        .par_iter()
        .zip(representatives)
        .map(|(cluster, chosen)| build_cluster_tree(matrix, cluster, chosen.root()))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_fanned_out(
    matrix: &DistanceMatrix,
    clusters: &[Cluster],
    representatives: &[Representatives],
    strategy: ExecutionStrategy,
) -> Result<Vec<SpanningTree>> {
    if strategy == ExecutionStrategy::Parallel {
        return Err(OverlayError::BackendUnavailable {
            requested: strategy,
        });
    }
    build_sequential(matrix, clusters, representatives)
}

/// Builds the minimum spanning tree over the cluster roots.
///
/// Roots are taken in cluster order and the tree is seeded at the first one.
/// Only direct matrix entries between roots are considered.
///
/// # Errors
/// Returns [`OverlayError::DisconnectedSubgraph`] with scope
/// [`TreeScope::Roots`] when some root is unreachable over direct root-to-root
/// distances, and [`OverlayError::InternalConsistency`] when there are no
/// roots at all.
#[instrument(
    name = "core.connect_clusters",
    err,
    skip_all,
    fields(roots = representatives.len()),
)]
pub fn connect_clusters(
    matrix: &DistanceMatrix,
    representatives: &[Representatives],
) -> Result<SpanningTree> {
    let roots: Vec<usize> = representatives.iter().map(Representatives::root).collect();
    let Some(&seed) = roots.first() else {
        return Err(OverlayError::InternalConsistency {
            invariant: "at least one cluster root",
            edges: 0,
            nodes: matrix.len(),
        });
    };
    let tree = prim::grow(matrix, &roots, seed, TreeScope::Roots)?;
    info!(edges = tree.edges.len(), "inter-cluster tree built");
    Ok(tree)
}

#[cfg(test)]
mod property;
