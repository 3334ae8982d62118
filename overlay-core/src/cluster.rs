//! Cluster identifiers and membership.

use std::fmt;

/// Identifier assigned to a cluster.
///
/// Identifiers are contiguous from zero and follow the order in which the
/// partitioner finalised each cluster.
///
/// # Examples
/// ```
/// use overlay_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-empty set of nodes produced by the partitioner.
///
/// Members are stored in ascending order, so the first member is also the
/// smallest node id in the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    id: ClusterId,
    members: Vec<usize>,
}

impl Cluster {
    /// Builds a cluster, sorting and deduplicating `members`.
    ///
    /// Returns `None` when `members` is empty.
    ///
    /// # Examples
    /// ```
    /// use overlay_core::{Cluster, ClusterId};
    ///
    /// let cluster = Cluster::new(ClusterId::new(0), vec![7, 2, 4, 2]).expect("non-empty");
    /// assert_eq!(cluster.members(), &[2, 4, 7]);
    /// assert_eq!(cluster.anchor(), 2);
    /// assert!(Cluster::new(ClusterId::new(1), Vec::new()).is_none());
    /// ```
    #[must_use]
    pub fn new(id: ClusterId, mut members: Vec<usize>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        members.sort_unstable();
        members.dedup();
        Some(Self { id, members })
    }

    /// Returns the cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn id(&self) -> ClusterId { self.id }

    /// Returns the members in ascending order.
    #[rustfmt::skip]
    #[must_use]
    pub fn members(&self) -> &[usize] { &self.members }

    /// Returns the number of members.
    #[rustfmt::skip]
    #[must_use]
    pub fn len(&self) -> usize { self.members.len() }

    /// Always `false`; clusters are never empty.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    /// Returns the smallest member.
    #[must_use]
    pub fn anchor(&self) -> usize {
        self.members.first().copied().unwrap_or_default()
    }

    /// Returns `true` when `node` belongs to the cluster.
    #[must_use]
    pub fn contains(&self, node: usize) -> bool {
        self.members.binary_search(&node).is_ok()
    }
}
