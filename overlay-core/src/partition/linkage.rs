//! Linkage criteria and the per-pair statistics they are computed from.

/// Criterion used to score the distance between two clusters.
///
/// Every criterion only considers finite pairwise distances; a pair of
/// clusters without any finite distance is never scored.
///
/// # Examples
/// ```
/// use overlay_core::Linkage;
///
/// assert_eq!(Linkage::default(), Linkage::Single);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Linkage {
    /// Smallest finite distance between any two members.
    #[default]
    Single,
    /// Largest finite distance between any two members.
    Complete,
    /// Mean of the finite distances between members.
    Average,
}

/// Aggregate of the finite distances between two clusters.
///
/// Combining two aggregates is associative, so the statistics for a merged
/// cluster follow directly from those of its parts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct PairStats {
    min: f32,
    max: f32,
    sum: f64,
    count: u64,
}

impl PairStats {
    pub(super) fn new(weight: f32) -> Self {
        Self {
            min: weight,
            max: weight,
            sum: f64::from(weight),
            count: 1,
        }
    }

    pub(super) fn combine(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "pair counts stay far below 2^52 for any graph that fits in memory"
    )]
    pub(super) fn value(&self, linkage: Linkage) -> f64 {
        match linkage {
            Linkage::Single => f64::from(self.min),
            Linkage::Complete => f64::from(self.max),
            Linkage::Average => self.sum / self.count as f64,
        }
    }
}
