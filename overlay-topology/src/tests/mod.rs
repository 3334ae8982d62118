pub(crate) use super::{
    ClusterRecord, NeighbourRecord, OverlayDocument, Topology, TopologyError,
    derived_output_path,
};
