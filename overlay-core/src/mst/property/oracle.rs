//! Brute-force minimum spanning tree oracle.
//!
//! Enumerates every `(n - 1)`-edge subset of the graph (or of the subgraph
//! induced by a member list) and keeps the lightest one that forms a
//! spanning tree. Exponential, so only used on
//! graphs with a handful of nodes.

use crate::{DistanceMatrix, mst::union_find::DisjointSet};

/// Largest node count the oracle is asked to handle.
pub(super) const ORACLE_MAX_NODES: usize = 6;

/// Returns the minimum spanning tree weight, or `None` when the graph is
/// disconnected.
pub(super) fn brute_force_weight(matrix: &DistanceMatrix) -> Option<f64> {
    let everyone: Vec<usize> = (0..matrix.len()).collect();
    brute_force_subset_weight(matrix, &everyone)
}

/// Returns the minimum spanning tree weight of the subgraph induced by
/// `members`, or `None` when that subgraph is disconnected.
pub(super) fn brute_force_subset_weight(matrix: &DistanceMatrix, members: &[usize]) -> Option<f64> {
    let count = members.len();
    if count <= 1 {
        return Some(0.0);
    }
    let slot_of = |node: usize| members.iter().position(|&member| member == node);
    let edges: Vec<(usize, usize, f64)> = members
        .iter()
        .enumerate()
        .flat_map(|(left, &node)| {
            matrix.neighbours(node).filter_map(move |(other, weight)| {
                slot_of(other)
                    .filter(|&right| left < right)
                    .map(|right| (left, right, f64::from(weight)))
            })
        })
        .collect();

    let mut best: Option<f64> = None;
    let mut chosen = Vec::with_capacity(count - 1);
    enumerate(&edges, 0, count - 1, &mut chosen, &mut |subset| {
        let mut set = DisjointSet::new(count);
        if subset.iter().all(|&index| set.union(edges[index].0, edges[index].1)) {
            let total: f64 = subset.iter().map(|&index| edges[index].2).sum();
            if best.is_none_or(|current| total < current) {
                best = Some(total);
            }
        }
    });
    best
}

fn enumerate(
    edges: &[(usize, usize, f64)],
    start: usize,
    remaining: usize,
    chosen: &mut Vec<usize>,
    visit: &mut impl FnMut(&[usize]),
) {
    if remaining == 0 {
        visit(chosen);
        return;
    }
    for index in start..edges.len() {
        if edges.len() - index < remaining {
            break;
        }
        chosen.push(index);
        enumerate(edges, index + 1, remaining - 1, chosen, visit);
        chosen.pop();
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::matrix;

    use super::{brute_force_subset_weight, brute_force_weight};

    #[test]
    fn square_drops_its_heaviest_side() {
        let square = matrix(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 0, 4.0)]);
        assert_eq!(brute_force_weight(&square), Some(6.0));
    }

    #[test]
    fn disconnected_graph_has_no_tree() {
        let split = matrix(4, &[(0, 1, 1.0), (2, 3, 1.0)]);
        assert_eq!(brute_force_weight(&split), None);
    }

    #[test]
    fn single_node_weighs_nothing() {
        assert_eq!(brute_force_weight(&matrix(1, &[])), Some(0.0));
    }

    #[test]
    fn subset_ignores_edges_leaving_the_members() {
        let graph = matrix(4, &[(0, 1, 9.0), (1, 2, 1.0), (0, 3, 1.0), (3, 2, 1.0), (0, 2, 5.0)]);
        assert_eq!(brute_force_subset_weight(&graph, &[0, 1, 2]), Some(6.0));
    }

    #[test]
    fn subset_without_internal_path_has_no_tree() {
        let graph = matrix(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        assert_eq!(brute_force_subset_weight(&graph, &[0, 2]), None);
    }
}
