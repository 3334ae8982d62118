//! Sparse, symmetric latency matrix.
//!
//! Unreachable pairs are absent from the adjacency rather than stored as an
//! infinite sentinel, so every weight handed out by [`DistanceMatrix`] is
//! finite and non-negative. The diagonal is implicitly zero.

use std::collections::{BTreeMap, btree_map::Entry};

use crate::error::MatrixError;

/// Read-only distance table over `0..len()` nodes.
///
/// # Examples
/// ```
/// use overlay_core::DistanceMatrix;
///
/// let matrix = DistanceMatrix::from_edges(3, [(0, 1, 4.0), (1, 2, 2.5)])?;
/// assert_eq!(matrix.distance(1, 0), Some(4.0));
/// assert_eq!(matrix.distance(0, 2), None);
/// assert_eq!(matrix.distance(2, 2), Some(0.0));
/// # Ok::<(), overlay_core::MatrixError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceMatrix {
    adjacency: Vec<BTreeMap<usize, f32>>,
    edge_count: usize,
}

impl DistanceMatrix {
    /// Builds a matrix from undirected `(left, right, weight)` edges.
    ///
    /// Self-edges of weight zero are ignored. Repeating an edge with the same
    /// weight (in either direction) is accepted.
    ///
    /// # Errors
    /// Returns [`MatrixError`] when an endpoint is out of bounds, a weight is
    /// negative or non-finite, a self-edge has a non-zero weight, or an edge
    /// repeats with a different weight.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self, MatrixError>
    where
        I: IntoIterator<Item = (usize, usize, f32)>,
    {
        let mut matrix = Self {
            adjacency: vec![BTreeMap::new(); node_count],
            edge_count: 0,
        };
        for (left, right, weight) in edges {
            matrix.insert(left, right, weight)?;
        }
        Ok(matrix)
    }

    /// Builds a matrix from dense rows where `None` marks an unreachable pair.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotSquare`] for ragged input,
    /// [`MatrixError::NonZeroDiagonal`] when a diagonal entry is missing or not zero,
    /// [`MatrixError::Asymmetric`] when mirrored entries disagree, and the
    /// weight errors of [`Self::from_edges`].
    ///
    /// # Examples
    /// ```
    /// use overlay_core::DistanceMatrix;
    ///
    /// let matrix = DistanceMatrix::from_dense(&[
    ///     vec![Some(0.0), Some(3.0), None],
    ///     vec![Some(3.0), Some(0.0), Some(1.0)],
    ///     vec![None, Some(1.0), Some(0.0)],
    /// ])?;
    /// assert_eq!(matrix.edge_count(), 2);
    /// # Ok::<(), overlay_core::MatrixError>(())
    /// ```
    pub fn from_dense(rows: &[Vec<Option<f32>>]) -> Result<Self, MatrixError> {
        let node_count = rows.len();
        for (row, entries) in rows.iter().enumerate() {
            if entries.len() != node_count {
                return Err(MatrixError::NotSquare {
                    row,
                    expected: node_count,
                    actual: entries.len(),
                });
            }
        }

        let mut edges = Vec::new();
        for (left, entries) in rows.iter().enumerate() {
            for (right, entry) in entries.iter().enumerate() {
                if left == right {
                    if !entry.is_some_and(|weight| weight == 0.0) {
                        return Err(MatrixError::NonZeroDiagonal { node: left });
                    }
                    continue;
                }
                let mirrored = rows[right][left];
                if !same_entry(*entry, mirrored) {
                    return Err(MatrixError::Asymmetric { left, right });
                }
                if let (Some(weight), true) = (*entry, left < right) {
                    edges.push((left, right, weight));
                }
            }
        }
        Self::from_edges(node_count, edges)
    }

    fn insert(&mut self, left: usize, right: usize, weight: f32) -> Result<(), MatrixError> {
        let node_count = self.adjacency.len();
        for node in [left, right] {
            if node >= node_count {
                return Err(MatrixError::OutOfBounds { node, node_count });
            }
        }
        if !weight.is_finite() {
            return Err(MatrixError::NonFiniteWeight { left, right });
        }
        if weight < 0.0 {
            return Err(MatrixError::NegativeWeight { left, right });
        }
        if left == right {
            if weight != 0.0 {
                return Err(MatrixError::NonZeroDiagonal { node: left });
            }
            return Ok(());
        }

        match self.adjacency[left].entry(right) {
            Entry::Occupied(existing) => {
                if existing.get().to_bits() != weight.to_bits() {
                    return Err(MatrixError::ConflictingEdge {
                        left: left.min(right),
                        right: left.max(right),
                    });
                }
                Ok(())
            }
            Entry::Vacant(slot) => {
                slot.insert(weight);
                self.adjacency[right].insert(left, weight);
                self.edge_count += 1;
                Ok(())
            }
        }
    }

    /// Returns the number of nodes.
    #[rustfmt::skip]
    #[must_use]
    pub fn len(&self) -> usize { self.adjacency.len() }

    /// Returns `true` when the matrix has no nodes.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.adjacency.is_empty() }

    /// Returns the number of finite undirected entries off the diagonal.
    #[rustfmt::skip]
    #[must_use]
    pub fn edge_count(&self) -> usize { self.edge_count }

    /// Returns the distance between two nodes, or `None` when the pair is
    /// unreachable or either node is out of bounds.
    #[must_use]
    pub fn distance(&self, left: usize, right: usize) -> Option<f32> {
        let row = self.adjacency.get(left)?;
        if left == right {
            return Some(0.0);
        }
        row.get(&right).copied()
    }

    /// Iterates the reachable neighbours of `node` in ascending id order.
    ///
    /// Yields nothing for an out-of-bounds node.
    pub fn neighbours(&self, node: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&other, &weight)| (other, weight)))
    }

    /// Returns the number of reachable neighbours of `node`.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.get(node).map_or(0, BTreeMap::len)
    }
}

fn same_entry(left: Option<f32>, right: Option<f32>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(a), Some(b)) => a.to_bits() == b.to_bits(),
        _ => false,
    }
}
