//! Per-cluster leader and root selection.
//!
//! The root seeds the cluster's spanning tree and is the cluster's endpoint
//! in the inter-cluster tree. The leader is reported to callers but does not
//! influence tree construction. Both choices are pure functions of the matrix
//! and the cluster, and every tie resolves to the lowest node id.

use tracing::{debug, instrument};

use crate::{
    cluster::{Cluster, ClusterId},
    matrix::DistanceMatrix,
};

/// Rule used to pick the root of each cluster.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RootPolicy {
    /// Member with the lowest sum of finite distances to the other members.
    #[default]
    Medoid,
    /// Member with the smallest finite distance to any node outside the
    /// cluster. Falls back to [`RootPolicy::Medoid`] when no member has an
    /// outward edge.
    Gateway,
}

/// Rule used to pick the leader of each cluster.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeaderPolicy {
    /// Member with the most finite distances to the other members.
    #[default]
    HighestDegree,
    /// Member with the largest node id.
    HighestId,
}

/// Leader and root chosen for one cluster.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Representatives {
    cluster: ClusterId,
    leader: usize,
    root: usize,
}

impl Representatives {
    /// Pairs a leader and a root with their cluster.
    ///
    /// Useful when driving the tree stages with externally chosen
    /// representatives; neither node is checked for membership here.
    #[must_use]
    pub fn new(cluster: ClusterId, leader: usize, root: usize) -> Self {
        Self {
            cluster,
            leader,
            root,
        }
    }

    /// Returns the cluster these representatives belong to.
    #[rustfmt::skip]
    #[must_use]
    pub fn cluster(&self) -> ClusterId { self.cluster }

    /// Returns the leader node.
    #[rustfmt::skip]
    #[must_use]
    pub fn leader(&self) -> usize { self.leader }

    /// Returns the root node.
    #[rustfmt::skip]
    #[must_use]
    pub fn root(&self) -> usize { self.root }
}

/// Selects the root of `cluster` under `policy`.
///
/// # Examples
/// ```
/// use overlay_core::{Cluster, ClusterId, DistanceMatrix, RootPolicy, select_root};
///
/// let matrix = DistanceMatrix::from_edges(
///     4,
///     [(0, 1, 5.0), (1, 2, 1.0), (0, 2, 5.0), (2, 3, 2.0)],
/// )?;
/// let cluster = Cluster::new(ClusterId::new(0), vec![0, 1, 2]).expect("non-empty");
/// assert_eq!(select_root(&matrix, &cluster, RootPolicy::Medoid), 1);
/// assert_eq!(select_root(&matrix, &cluster, RootPolicy::Gateway), 2);
/// # Ok::<(), overlay_core::MatrixError>(())
/// ```
#[must_use]
pub fn select_root(matrix: &DistanceMatrix, cluster: &Cluster, policy: RootPolicy) -> usize {
    match policy {
        RootPolicy::Medoid => medoid(matrix, cluster),
        RootPolicy::Gateway => gateway(matrix, cluster).unwrap_or_else(|| medoid(matrix, cluster)),
    }
}

/// Selects the leader of `cluster` under `policy`.
#[must_use]
pub fn select_leader(matrix: &DistanceMatrix, cluster: &Cluster, policy: LeaderPolicy) -> usize {
    match policy {
        LeaderPolicy::HighestDegree => lowest_by_key(cluster, |node| {
            let degree = matrix
                .neighbours(node)
                .filter(|&(other, _)| cluster.contains(other))
                .count();
            std::cmp::Reverse(degree)
        }),
        LeaderPolicy::HighestId => cluster.members().last().copied().unwrap_or_default(),
    }
}

/// Selects representatives for every cluster, in cluster order.
#[instrument(
    name = "core.select_representatives",
    skip_all,
    fields(clusters = clusters.len(), root_policy = ?roots, leader_policy = ?leaders),
)]
#[must_use]
pub fn select_representatives(
    matrix: &DistanceMatrix,
    clusters: &[Cluster],
    roots: RootPolicy,
    leaders: LeaderPolicy,
) -> Vec<Representatives> {
    clusters
        .iter()
        .map(|cluster| {
            let selected = Representatives::new(
                cluster.id(),
                select_leader(matrix, cluster, leaders),
                select_root(matrix, cluster, roots),
            );
            debug!(
                cluster = %selected.cluster,
                leader = selected.leader,
                root = selected.root,
                "representatives selected"
            );
            selected
        })
        .collect()
}

fn medoid(matrix: &DistanceMatrix, cluster: &Cluster) -> usize {
    lowest_by_key(cluster, |node| {
        let total: f64 = matrix
            .neighbours(node)
            .filter(|&(other, _)| cluster.contains(other))
            .map(|(_, weight)| f64::from(weight))
            .sum();
        OrderedWeight(total)
    })
}

fn gateway(matrix: &DistanceMatrix, cluster: &Cluster) -> Option<usize> {
    let mut best: Option<(f32, usize)> = None;
    for &node in cluster.members() {
        let outward = matrix
            .neighbours(node)
            .filter(|&(other, _)| !cluster.contains(other))
            .map(|(_, weight)| weight)
            .min_by(f32::total_cmp);
        if let Some(weight) = outward
            && best.is_none_or(|(current, _)| weight.total_cmp(&current).is_lt())
        {
            best = Some((weight, node));
        }
    }
    best.map(|(_, node)| node)
}

/// Returns the member with the smallest key, preferring the lowest id.
fn lowest_by_key<K: Ord>(cluster: &Cluster, mut key: impl FnMut(usize) -> K) -> usize {
    cluster
        .members()
        .iter()
        .copied()
        .min_by_key(|&node| (key(node), node))
        .unwrap_or_default()
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct OrderedWeight(f64);

impl Eq for OrderedWeight {}

impl PartialOrd for OrderedWeight {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedWeight {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
