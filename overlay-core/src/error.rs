//! Error types for the overlay core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::{builder::ExecutionStrategy, cluster::ClusterId, mst::TreeEdge};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing a [`crate::DistanceMatrix`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MatrixError {
    /// An edge referenced a node outside `0..node_count`.
    #[error("node {node} is out of bounds for a matrix of {node_count} nodes")]
    OutOfBounds {
        /// The offending node index.
        node: usize,
        /// Number of nodes in the matrix.
        node_count: usize,
    },
    /// An edge weight was NaN or infinite.
    #[error("edge ({left}, {right}) has a non-finite weight")]
    NonFiniteWeight {
        /// First endpoint as supplied.
        left: usize,
        /// Second endpoint as supplied.
        right: usize,
    },
    /// An edge weight was below zero.
    #[error("edge ({left}, {right}) has a negative weight")]
    NegativeWeight {
        /// First endpoint as supplied.
        left: usize,
        /// Second endpoint as supplied.
        right: usize,
    },
    /// A node's distance to itself was missing or non-zero.
    #[error("node {node} must have a zero distance to itself")]
    NonZeroDiagonal {
        /// The node whose diagonal entry was rejected.
        node: usize,
    },
    /// A dense row did not have one entry per node.
    #[error("row {row} has {actual} entries but the matrix has {expected} rows")]
    NotSquare {
        /// Index of the malformed row.
        row: usize,
        /// Number of rows, and therefore the required row length.
        expected: usize,
        /// Length of the malformed row.
        actual: usize,
    },
    /// Mirrored entries of a dense matrix disagreed.
    #[error("entries ({left}, {right}) and ({right}, {left}) disagree")]
    Asymmetric {
        /// Row of the first entry.
        left: usize,
        /// Column of the first entry.
        right: usize,
    },
    /// The same undirected edge was supplied twice with different weights.
    #[error("edge ({left}, {right}) was supplied twice with different weights")]
    ConflictingEdge {
        /// Smaller endpoint.
        left: usize,
        /// Larger endpoint.
        right: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`MatrixError`] variants.
    enum MatrixErrorCode for MatrixError {
        /// An edge referenced a node outside `0..node_count`.
        OutOfBounds => OutOfBounds { .. } => "MATRIX_OUT_OF_BOUNDS",
        /// An edge weight was NaN or infinite.
        NonFiniteWeight => NonFiniteWeight { .. } => "MATRIX_NON_FINITE_WEIGHT",
        /// An edge weight was below zero.
        NegativeWeight => NegativeWeight { .. } => "MATRIX_NEGATIVE_WEIGHT",
        /// A node's distance to itself was missing or non-zero.
        NonZeroDiagonal => NonZeroDiagonal { .. } => "MATRIX_NON_ZERO_DIAGONAL",
        /// A dense row did not have one entry per node.
        NotSquare => NotSquare { .. } => "MATRIX_NOT_SQUARE",
        /// Mirrored entries of a dense matrix disagreed.
        Asymmetric => Asymmetric { .. } => "MATRIX_ASYMMETRIC",
        /// The same undirected edge was supplied twice with different weights.
        ConflictingEdge => ConflictingEdge { .. } => "MATRIX_CONFLICTING_EDGE",
    }
}

/// The vertex set a failed spanning-tree build was working over.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TreeScope {
    /// The induced subgraph of one cluster.
    Cluster(ClusterId),
    /// The set of cluster roots.
    Roots,
}

impl fmt::Display for TreeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster(id) => write!(f, "cluster {id}"),
            Self::Roots => f.write_str("cluster roots"),
        }
    }
}

/// Error type produced when configuring or running the overlay pipeline.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OverlayError {
    /// The requested cluster count was zero.
    #[error("cluster count must be at least 1 (got {requested})")]
    InvalidClusterCount {
        /// The cluster count supplied by the caller.
        requested: usize,
    },
    /// The requested cluster count exceeded the number of nodes.
    #[error("cannot form {requested} clusters from {nodes} nodes")]
    TooManyClusters {
        /// The cluster count supplied by the caller.
        requested: usize,
        /// Number of nodes in the distance matrix.
        nodes: usize,
    },
    /// The distance matrix contained no nodes.
    #[error("distance matrix contains no nodes")]
    EmptyGraph,
    /// Agglomeration stalled before reaching the target cluster count.
    #[error(
        "cannot reduce {} clusters to {target}: no remaining pair is linked by a finite distance",
        .clusters.len()
    )]
    UnreachablePartition {
        /// Cluster count the partitioner was asked for.
        target: usize,
        /// Cluster membership at the point agglomeration stalled.
        clusters: Vec<Vec<usize>>,
    },
    /// A spanning tree could not reach every vertex over finite edges.
    #[error("{scope} is disconnected: node {unreachable} is unreachable over finite edges")]
    DisconnectedSubgraph {
        /// Which vertex set the tree was spanning.
        scope: TreeScope,
        /// Lowest node id left outside the tree.
        unreachable: usize,
        /// Edges accepted before the build stalled.
        partial: Vec<TreeEdge>,
    },
    /// The assembled tree broke a structural invariant.
    #[error("internal consistency failure: {invariant} ({edges} edges over {nodes} nodes)")]
    InternalConsistency {
        /// Name of the violated invariant.
        invariant: &'static str,
        /// Number of edges in the structure under inspection.
        edges: usize,
        /// Number of nodes in the structure under inspection.
        nodes: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
    /// The distance matrix could not be constructed.
    #[error("invalid distance matrix: {error}")]
    Matrix {
        /// Underlying matrix validation failure.
        #[from]
        error: MatrixError,
    },
}

define_error_codes! {
    /// Stable codes describing [`OverlayError`] variants.
    enum OverlayErrorCode for OverlayError {
        /// The requested cluster count was zero.
        InvalidClusterCount => InvalidClusterCount { .. } => "OVERLAY_INVALID_CLUSTER_COUNT",
        /// The requested cluster count exceeded the number of nodes.
        TooManyClusters => TooManyClusters { .. } => "OVERLAY_TOO_MANY_CLUSTERS",
        /// The distance matrix contained no nodes.
        EmptyGraph => EmptyGraph => "OVERLAY_EMPTY_GRAPH",
        /// Agglomeration stalled before reaching the target cluster count.
        UnreachablePartition => UnreachablePartition { .. } => "OVERLAY_UNREACHABLE_PARTITION",
        /// A spanning tree could not reach every vertex over finite edges.
        DisconnectedSubgraph => DisconnectedSubgraph { .. } => "OVERLAY_DISCONNECTED_SUBGRAPH",
        /// The assembled tree broke a structural invariant.
        InternalConsistency => InternalConsistency { .. } => "OVERLAY_INTERNAL_CONSISTENCY",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "OVERLAY_BACKEND_UNAVAILABLE",
        /// The distance matrix could not be constructed.
        Matrix => Matrix { .. } => "OVERLAY_MATRIX",
    }
}

impl OverlayError {
    /// Retrieve the inner [`MatrixErrorCode`] when the error came from matrix
    /// validation.
    #[must_use]
    pub const fn matrix_code(&self) -> Option<MatrixErrorCode> {
        match self {
            Self::Matrix { error } => Some(error.code()),
            _ => None,
        }
    }

    /// Returns `true` for failures that indicate a defect in the pipeline
    /// rather than a problem with the input or configuration.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::InternalConsistency { .. })
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, OverlayError>;
