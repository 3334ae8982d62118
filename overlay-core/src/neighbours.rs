//! Projection of the global tree onto per-node neighbour lists.

use tracing::{info, instrument};

use crate::assemble::GlobalTree;

/// One adjacent node in the overlay and the latency to reach it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    node: usize,
    weight: f32,
}

impl Neighbour {
    /// Returns the adjacent node.
    #[rustfmt::skip]
    #[must_use]
    pub fn node(&self) -> usize { self.node }

    /// Returns the latency of the connecting tree edge.
    #[rustfmt::skip]
    #[must_use]
    pub fn weight(&self) -> f32 { self.weight }
}

/// Overlay neighbours of every node.
///
/// Each list is sorted by ascending weight, then by neighbour id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighbourTable {
    lists: Vec<Vec<Neighbour>>,
}

impl NeighbourTable {
    /// Returns the number of nodes in the table.
    #[rustfmt::skip]
    #[must_use]
    pub fn len(&self) -> usize { self.lists.len() }

    /// Returns `true` when the table covers no nodes.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.lists.is_empty() }

    /// Returns the neighbours of `node`, or an empty slice when `node` is out
    /// of range.
    #[must_use]
    pub fn neighbours(&self, node: usize) -> &[Neighbour] {
        self.lists.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates `(node, neighbours)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Neighbour])> + '_ {
        self.lists.iter().map(Vec::as_slice).enumerate()
    }
}

/// Builds the neighbour table of `tree`.
///
/// Every tree edge contributes one entry to each of its endpoints.
///
/// # Examples
/// ```
/// use overlay_core::{OverlayBuilder, DistanceMatrix, derive_neighbours};
///
/// let matrix = DistanceMatrix::from_edges(3, [(0, 1, 2.0), (1, 2, 1.0)])?;
/// let plan = OverlayBuilder::new().build()?.run(&matrix)?;
/// let table = derive_neighbours(plan.global_tree());
/// let around_one: Vec<usize> = table.neighbours(1).iter().map(|n| n.node()).collect();
/// assert_eq!(around_one, vec![2, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.derive_neighbours",
    skip_all,
    fields(nodes = tree.node_count(), edges = tree.edges().len()),
)]
#[must_use]
pub fn derive_neighbours(tree: &GlobalTree) -> NeighbourTable {
    let mut lists: Vec<Vec<Neighbour>> = vec![Vec::new(); tree.node_count()];
    for edge in tree.edges() {
        for (from, to) in [(edge.source(), edge.target()), (edge.target(), edge.source())] {
            if let Some(list) = lists.get_mut(from) {
                list.push(Neighbour {
                    node: to,
                    weight: edge.weight(),
                });
            }
        }
    }
    for list in &mut lists {
        list.sort_unstable_by(|left, right| {
            left.weight
                .total_cmp(&right.weight)
                .then_with(|| left.node.cmp(&right.node))
        });
    }
    info!(
        max_degree = lists.iter().map(Vec::len).max().unwrap_or(0),
        "neighbour lists derived"
    );
    NeighbourTable { lists }
}
