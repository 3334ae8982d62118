//! Prim's algorithm restricted to a vertex subset.
//!
//! The subset is small relative to the matrix in the common case, so the
//! frontier is a dense per-vertex candidate table scanned linearly rather
//! than a heap. The linear scan in ascending vertex order also gives the
//! destination-id tie-break for free.

use std::cmp::Ordering;

use tracing::warn;

use crate::{
    Result,
    error::{OverlayError, TreeScope},
    matrix::DistanceMatrix,
};

use super::{SpanningTree, TreeEdge};

/// Cheapest known connection from the tree to one outside vertex.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    weight: f32,
    source: usize,
}

impl Candidate {
    fn improves_on(self, current: Option<Self>) -> bool {
        current.is_none_or(|current| {
            self.weight
                .total_cmp(&current.weight)
                .then_with(|| self.source.cmp(&current.source))
                == Ordering::Less
        })
    }
}

/// Grows a minimum spanning tree over `vertices` from `seed`.
///
/// Among equal-weight frontier edges the lowest destination id wins, then
/// the lowest source id.
pub(super) fn grow(
    matrix: &DistanceMatrix,
    vertices: &[usize],
    seed: usize,
    scope: TreeScope,
) -> Result<SpanningTree> {
    let mut sorted = vertices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let slot_of = |node: usize| sorted.binary_search(&node).ok();

    let Some(seed_slot) = slot_of(seed) else {
        return Err(OverlayError::InternalConsistency {
            invariant: "tree seed belongs to its vertex set",
            edges: 0,
            nodes: sorted.len(),
        });
    };

    let mut in_tree = vec![false; sorted.len()];
    let mut frontier: Vec<Option<Candidate>> = vec![None; sorted.len()];
    let mut edges = Vec::with_capacity(sorted.len().saturating_sub(1));

    let mut added = seed_slot;
    for _ in 1..sorted.len() {
        in_tree[added] = true;
        let source = sorted[added];
        for (neighbour, weight) in matrix.neighbours(source) {
            let Some(slot) = slot_of(neighbour) else {
                continue;
            };
            let candidate = Candidate { weight, source };
            if !in_tree[slot] && candidate.improves_on(frontier[slot]) {
                frontier[slot] = Some(candidate);
            }
        }

        let Some((next, link)) = cheapest(&in_tree, &frontier) else {
            let unreachable = in_tree
                .iter()
                .position(|&inside| !inside)
                .map_or(seed, |slot| sorted[slot]);
            warn!(
                %scope,
                unreachable,
                spanned = edges.len() + 1,
                vertices = sorted.len(),
                "spanning tree stalled on an unreachable vertex"
            );
            return Err(OverlayError::DisconnectedSubgraph {
                scope,
                unreachable,
                partial: edges,
            });
        };
        edges.push(TreeEdge::new(link.source, sorted[next], link.weight));
        added = next;
    }

    Ok(SpanningTree {
        root: seed,
        vertices: sorted,
        edges,
    })
}

fn cheapest(in_tree: &[bool], frontier: &[Option<Candidate>]) -> Option<(usize, Candidate)> {
    let mut best: Option<(usize, Candidate)> = None;
    for (slot, candidate) in frontier.iter().enumerate() {
        let Some(candidate) = *candidate else {
            continue;
        };
        if in_tree[slot] {
            continue;
        }
        if best.is_none_or(|(_, current)| candidate.weight.total_cmp(&current.weight).is_lt()) {
            best = Some((slot, candidate));
        }
    }
    best
}
