//! Overlay core library.
//!
//! Turns a latency-weighted [`DistanceMatrix`] into a sparse, tree-shaped
//! gossip overlay. The pipeline runs strictly forward:
//!
//! 1. [`partition`] merges nodes agglomeratively into the requested number of
//!    [`Cluster`]s.
//! 2. [`select_representatives`] picks a leader and a tree root per cluster.
//! 3. [`build_intra_trees`] grows a Prim tree inside every cluster (in
//!    parallel when the `parallel` feature is enabled).
//! 4. [`connect_clusters`] spans the cluster roots.
//! 5. [`assemble_global_tree`] unions both layers and checks the tree
//!    invariants.
//! 6. [`derive_neighbours`] projects the tree into per-node neighbour lists.
//!
//! [`OverlayBuilder`] wires the stages together and returns an
//! [`OverlayPlan`] holding every intermediate result.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod assemble;
mod builder;
mod cluster;
mod error;
mod matrix;
mod mst;
mod neighbours;
mod overlay;
mod partition;
mod plan;
mod representatives;

#[cfg(test)]
mod test_utils;

pub use crate::{
    assemble::{GlobalTree, assemble_global_tree},
    builder::{ExecutionStrategy, OverlayBuilder},
    cluster::{Cluster, ClusterId},
    error::{MatrixError, MatrixErrorCode, OverlayError, OverlayErrorCode, Result, TreeScope},
    matrix::DistanceMatrix,
    mst::{SpanningTree, TreeEdge, build_cluster_tree, build_intra_trees, connect_clusters},
    neighbours::{Neighbour, NeighbourTable, derive_neighbours},
    overlay::Overlay,
    partition::{Linkage, partition},
    plan::OverlayPlan,
    representatives::{
        LeaderPolicy, Representatives, RootPolicy, select_leader, select_representatives,
        select_root,
    },
};
