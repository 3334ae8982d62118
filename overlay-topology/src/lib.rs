//! JSON exchange format for overlay topologies.
//!
//! [`Topology`] loads a node list plus either an edge list or a dense latency
//! matrix into a [`overlay_core::DistanceMatrix`]. [`OverlayDocument`] is the
//! derived overlay written back out for downstream consumers.

mod errors;
mod input;
mod output;

pub use errors::TopologyError;
pub use input::{NodeRecord, Topology};
pub use output::{
    ClusterRecord, NeighbourRecord, OverlayDocument, OverlayNodeRecord, derived_output_path,
};

#[cfg(test)]
mod tests;
