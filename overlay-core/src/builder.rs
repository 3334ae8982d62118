//! Builder utilities for configuring overlay construction.
//!
//! Exposes the execution strategy selection surface and the validation done
//! before an [`Overlay`] is constructed.

use std::num::NonZeroUsize;

use crate::{
    Result,
    error::OverlayError,
    overlay::Overlay,
    partition::Linkage,
    representatives::{LeaderPolicy, RootPolicy},
};

/// Indicates how [`Overlay::run`] schedules the per-cluster tree builds.
///
/// `Auto` fans the builds out on the rayon pool when the `parallel` feature
/// is compiled in and runs them in cluster order otherwise, so it succeeds in
/// every build. `Parallel` insists on the rayon pool.
///
/// # Examples
/// ```
/// use overlay_core::ExecutionStrategy;
///
/// assert_eq!(ExecutionStrategy::default(), ExecutionStrategy::Auto);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionStrategy {
    /// Use the rayon pool when available, sequential execution otherwise.
    #[default]
    Auto,
    /// Require the rayon pool.
    Parallel,
    /// Build cluster trees one after another on the calling thread.
    Sequential,
}

impl ExecutionStrategy {
    /// Returns `true` when the strategy can run in the current build.
    #[must_use]
    pub const fn is_available(self) -> bool {
        match self {
            Self::Auto | Self::Sequential => true,
            Self::Parallel => cfg!(feature = "parallel"),
        }
    }
}

/// Configures and constructs [`Overlay`] instances.
///
/// # Examples
/// ```
/// use overlay_core::{ExecutionStrategy, Linkage, OverlayBuilder, RootPolicy};
///
/// let overlay = OverlayBuilder::new()
///     .with_cluster_count(3)
///     .with_linkage(Linkage::Complete)
///     .with_root_policy(RootPolicy::Gateway)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(overlay.cluster_count().get(), 3);
/// assert_eq!(overlay.linkage(), Linkage::Complete);
/// ```
#[derive(Debug, Clone)]
pub struct OverlayBuilder {
    cluster_count: usize,
    linkage: Linkage,
    root_policy: RootPolicy,
    leader_policy: LeaderPolicy,
    execution_strategy: ExecutionStrategy,
}

impl Default for OverlayBuilder {
    fn default() -> Self {
        Self {
            cluster_count: 1,
            linkage: Linkage::default(),
            root_policy: RootPolicy::default(),
            leader_policy: LeaderPolicy::default(),
            execution_strategy: ExecutionStrategy::default(),
        }
    }
}

impl OverlayBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use overlay_core::{ExecutionStrategy, Linkage, OverlayBuilder};
    ///
    /// let builder = OverlayBuilder::new();
    /// assert_eq!(builder.cluster_count(), 1);
    /// assert_eq!(builder.linkage(), Linkage::Single);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of clusters to partition into.
    #[must_use]
    pub fn with_cluster_count(mut self, count: usize) -> Self {
        self.cluster_count = count;
        self
    }

    /// Returns the configured cluster count.
    #[rustfmt::skip]
    #[must_use]
    pub fn cluster_count(&self) -> usize { self.cluster_count }

    /// Sets the linkage criterion used by the partitioner.
    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Returns the configured linkage criterion.
    #[rustfmt::skip]
    #[must_use]
    pub fn linkage(&self) -> Linkage { self.linkage }

    /// Sets the rule used to pick each cluster's root.
    #[must_use]
    pub fn with_root_policy(mut self, policy: RootPolicy) -> Self {
        self.root_policy = policy;
        self
    }

    /// Returns the configured root policy.
    #[rustfmt::skip]
    #[must_use]
    pub fn root_policy(&self) -> RootPolicy { self.root_policy }

    /// Sets the rule used to pick each cluster's leader.
    #[must_use]
    pub fn with_leader_policy(mut self, policy: LeaderPolicy) -> Self {
        self.leader_policy = policy;
        self
    }

    /// Returns the configured leader policy.
    #[rustfmt::skip]
    #[must_use]
    pub fn leader_policy(&self) -> LeaderPolicy { self.leader_policy }

    /// Sets the execution strategy for the per-cluster tree builds.
    ///
    /// # Examples
    /// ```
    /// use overlay_core::{ExecutionStrategy, OverlayBuilder};
    ///
    /// let builder = OverlayBuilder::new().with_execution_strategy(ExecutionStrategy::Sequential);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Sequential);
    /// ```
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[rustfmt::skip]
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy { self.execution_strategy }

    /// Validates the configuration and constructs an [`Overlay`].
    ///
    /// # Errors
    /// Returns [`OverlayError::InvalidClusterCount`] when the cluster count is
    /// zero.
    ///
    /// # Examples
    /// ```
    /// use overlay_core::{OverlayBuilder, OverlayError};
    ///
    /// let err = OverlayBuilder::new().with_cluster_count(0).build().unwrap_err();
    /// assert_eq!(err, OverlayError::InvalidClusterCount { requested: 0 });
    /// ```
    pub fn build(self) -> Result<Overlay> {
        let cluster_count =
            NonZeroUsize::new(self.cluster_count).ok_or(OverlayError::InvalidClusterCount {
                requested: self.cluster_count,
            })?;

        Ok(Overlay::new(
            cluster_count,
            self.linkage,
            self.root_policy,
            self.leader_policy,
            self.execution_strategy,
        ))
    }
}
