//! Agglomerative cluster partitioning.
//!
//! Starts from one singleton cluster per node and repeatedly merges the pair
//! of clusters with the smallest finite linkage until the requested number of
//! clusters remains. Linkage statistics are tracked only for cluster pairs
//! joined by at least one finite distance, so unreachable pairs never become
//! merge candidates.
//!
//! Merged clusters move to the end of the finalisation order; the surviving
//! order becomes the [`ClusterId`] numbering.

mod linkage;

use std::{collections::BTreeMap, mem};

use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    cluster::{Cluster, ClusterId},
    error::OverlayError,
    matrix::DistanceMatrix,
};

pub use self::linkage::Linkage;

use self::linkage::PairStats;

/// Partitions the nodes of `matrix` into exactly `target` clusters.
///
/// Ties on equal linkage resolve to the pair with the lowest `(anchor, anchor)`
/// ids, where a cluster's anchor is its smallest member.
///
/// # Errors
/// Returns [`OverlayError::EmptyGraph`] for an empty matrix,
/// [`OverlayError::InvalidClusterCount`] when `target == 0`,
/// [`OverlayError::TooManyClusters`] when `target` exceeds the node count, and
/// [`OverlayError::UnreachablePartition`] when merges are still required but
/// no remaining pair of clusters is linked by a finite distance.
///
/// # Examples
/// ```
/// use overlay_core::{DistanceMatrix, Linkage, partition};
///
/// let matrix = DistanceMatrix::from_edges(
///     4,
///     [(0, 1, 1.0), (2, 3, 1.5), (1, 2, 9.0)],
/// )?;
/// let clusters = partition(&matrix, 2, Linkage::Single)?;
/// assert_eq!(clusters[0].members(), &[0, 1]);
/// assert_eq!(clusters[1].members(), &[2, 3]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.partition",
    err,
    skip_all,
    fields(nodes = matrix.len(), requested = target, linkage = ?linkage),
)]
pub fn partition(matrix: &DistanceMatrix, target: usize, linkage: Linkage) -> Result<Vec<Cluster>> {
    let nodes = matrix.len();
    if nodes == 0 {
        return Err(OverlayError::EmptyGraph);
    }
    if target == 0 {
        return Err(OverlayError::InvalidClusterCount { requested: target });
    }
    if target > nodes {
        return Err(OverlayError::TooManyClusters {
            requested: target,
            nodes,
        });
    }

    let mut state = Agglomeration::new(matrix);
    while state.active() > target {
        let Some((left, right, value)) = state.closest_pair(linkage) else {
            let clusters = state.snapshot();
            warn!(
                remaining = clusters.len(),
                requested = target,
                "agglomeration stalled on unreachable cluster pairs"
            );
            return Err(OverlayError::UnreachablePartition { target, clusters });
        };
        debug!(left, right, linkage = value, "merging clusters");
        state.merge(left, right);
    }

    let clusters = state.finish();
    info!(clusters = clusters.len(), "partitioning completed");
    Ok(clusters)
}

/// Working state of the merge loop.
///
/// Slots are indexed by the anchor of the cluster they hold. Merging slot
/// `right` into slot `left` (with `left < right`) keeps `left` as the anchor
/// of the union.
struct Agglomeration {
    members: Vec<Vec<usize>>,
    links: Vec<BTreeMap<usize, PairStats>>,
    order: Vec<usize>,
}

impl Agglomeration {
    fn new(matrix: &DistanceMatrix) -> Self {
        let nodes = matrix.len();
        let members = (0..nodes).map(|node| vec![node]).collect();
        let links = (0..nodes)
            .map(|node| {
                matrix
                    .neighbours(node)
                    .map(|(other, weight)| (other, PairStats::new(weight)))
                    .collect()
            })
            .collect();
        Self {
            members,
            links,
            order: (0..nodes).collect(),
        }
    }

    fn active(&self) -> usize {
        self.order.len()
    }

    fn closest_pair(&self, linkage: Linkage) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for &left in &self.order {
            for (&right, stats) in self.links[left].range(left + 1..) {
                let value = stats.value(linkage);
                let improves = best.is_none_or(|(best_left, best_right, best_value)| {
                    value
                        .total_cmp(&best_value)
                        .then_with(|| (left, right).cmp(&(best_left, best_right)))
                        .is_lt()
                });
                if improves {
                    best = Some((left, right, value));
                }
            }
        }
        best
    }

    fn merge(&mut self, left: usize, right: usize) {
        let absorbed = mem::take(&mut self.members[right]);
        self.members[left].extend(absorbed);
        self.members[left].sort_unstable();

        let absorbed_links = mem::take(&mut self.links[right]);
        self.links[left].remove(&right);
        for (other, stats) in absorbed_links {
            if other == left {
                continue;
            }
            self.links[other].remove(&right);
            let combined = self.links[left]
                .get(&other)
                .map_or(stats, |existing| existing.combine(stats));
            self.links[left].insert(other, combined);
            self.links[other].insert(left, combined);
        }

        self.order.retain(|&slot| slot != left && slot != right);
        self.order.push(left);
    }

    fn snapshot(&self) -> Vec<Vec<usize>> {
        self.order
            .iter()
            .map(|&slot| self.members[slot].clone())
            .collect()
    }

    fn finish(mut self) -> Vec<Cluster> {
        self.order
            .iter()
            .enumerate()
            .filter_map(|(index, &slot)| {
                Cluster::new(ClusterId::new(index), mem::take(&mut self.members[slot]))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
