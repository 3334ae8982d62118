//! The derived overlay document handed to downstream consumers.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use overlay_core::{ClusterId, OverlayPlan};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{errors::TopologyError, input::Topology};

const DERIVED_SUFFIX: &str = "_agglomerative";
const FALLBACK_STEM: &str = "topology";

/// One cluster of the overlay, described by node ids.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ClusterRecord {
    /// Cluster id.
    pub id: usize,
    /// Node acting as the cluster's coordinator.
    pub leader: String,
    /// Node attaching the cluster to the inter-cluster tree.
    pub root: String,
    /// Member ids in ascending index order.
    pub members: Vec<String>,
}

/// An overlay neighbour and the latency to reach it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NeighbourRecord {
    /// Neighbour id.
    pub id: String,
    /// Latency of the connecting tree edge.
    pub latency: f32,
}

/// A node of the overlay with its cluster, neighbours and original metadata.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OverlayNodeRecord {
    /// Node id.
    pub id: String,
    /// Cluster the node belongs to.
    pub cluster: usize,
    /// Overlay neighbours, nearest first.
    pub neighbors: Vec<NeighbourRecord>,
    /// Metadata copied from the input document.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// The overlay document: clusters plus per-node neighbour lists.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OverlayDocument {
    /// Clusters in id order.
    pub clusters: Vec<ClusterRecord>,
    /// Nodes in input document order.
    pub nodes: Vec<OverlayNodeRecord>,
}

impl OverlayDocument {
    /// Describes `plan` in terms of the node ids of `topology`.
    ///
    /// # Errors
    /// Returns [`TopologyError::PlanMismatch`] when the plan was not computed
    /// over the topology's node set.
    #[instrument(
        name = "topology.render",
        err,
        skip_all,
        fields(nodes = topology.len(), clusters = plan.clusters().len()),
    )]
    pub fn from_plan(topology: &Topology, plan: &OverlayPlan) -> Result<Self, TopologyError> {
        let mismatch = || TopologyError::PlanMismatch {
            plan: plan.node_count(),
            topology: topology.len(),
        };
        if plan.node_count() != topology.len() {
            return Err(mismatch());
        }
        let label = |node: usize| {
            topology
                .id(node)
                .map(ToOwned::to_owned)
                .ok_or_else(mismatch)
        };

        let clusters = plan
            .clusters()
            .iter()
            .zip(plan.representatives())
            .map(|(cluster, representatives)| -> Result<ClusterRecord, TopologyError> {
                Ok(ClusterRecord {
                    id: cluster.id().get(),
                    leader: label(representatives.leader())?,
                    root: label(representatives.root())?,
                    members: cluster
                        .members()
                        .iter()
                        .map(|&member| label(member))
                        .collect::<Result<Vec<_>, _>>()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let nodes = topology
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| -> Result<OverlayNodeRecord, TopologyError> {
                let neighbors = plan
                    .neighbours()
                    .neighbours(index)
                    .iter()
                    .map(|neighbour| -> Result<NeighbourRecord, TopologyError> {
                        Ok(NeighbourRecord {
                            id: label(neighbour.node())?,
                            latency: neighbour.weight(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(OverlayNodeRecord {
                    id: node.id.clone(),
                    cluster: plan
                        .cluster_of(index)
                        .map(ClusterId::get)
                        .ok_or_else(mismatch)?,
                    neighbors,
                    metadata: node.metadata.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(clusters = clusters.len(), "overlay document rendered");
        Ok(Self { clusters, nodes })
    }

    /// Writes the document to `writer` as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`TopologyError::Json`] when serialisation or the underlying
    /// write fails.
    pub fn write_to(&self, writer: impl Write) -> Result<(), TopologyError> {
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }
}

/// Returns where the overlay derived from `input` is stored: next to the
/// input, with `_agglomerative` appended to its stem and a `.json` extension.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use overlay_topology::derived_output_path;
///
/// let path = derived_output_path(Path::new("/data/eu-west.json"));
/// assert_eq!(path, Path::new("/data/eu-west_agglomerative.json"));
/// ```
#[must_use]
pub fn derived_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or(Cow::Borrowed(FALLBACK_STEM), |stem| stem.to_string_lossy());
    input.with_file_name(format!("{stem}{DERIVED_SUFFIX}.json"))
}
