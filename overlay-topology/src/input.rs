//! Loading topology documents into a distance matrix.

use std::collections::{HashMap, hash_map::Entry};
use std::io::Read;

use overlay_core::{DistanceMatrix, MatrixError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{Span, field, info, instrument};

use crate::errors::{RESERVED_FIELDS, TopologyError};

/// A node entry: its unique id plus any metadata carried alongside it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NodeRecord {
    /// Unique node id.
    pub id: String,
    /// Remaining fields of the entry, passed through untouched.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Option<Vec<RawEdge>>,
    #[serde(default)]
    matrix: Option<Vec<Vec<Option<f32>>>>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    source: String,
    target: String,
    latency: f32,
}

/// A validated topology: nodes in document order and their latencies.
///
/// # Examples
/// ```
/// use overlay_topology::Topology;
///
/// let topology = Topology::from_json_str(
///     r#"{
///         "nodes": [{ "id": "a" }, { "id": "b", "region": "eu" }],
///         "edges": [{ "source": "a", "target": "b", "latency": 12.5 }]
///     }"#,
/// )?;
/// assert_eq!(topology.len(), 2);
/// assert_eq!(topology.index_of("b"), Some(1));
/// assert_eq!(topology.matrix().distance(0, 1), Some(12.5));
/// # Ok::<(), overlay_topology::TopologyError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    nodes: Vec<NodeRecord>,
    matrix: DistanceMatrix,
}

impl Topology {
    /// Parses and validates a topology document from `reader`.
    ///
    /// # Errors
    /// Returns [`TopologyError::Json`] for malformed input and the
    /// validation errors of [`Self::from_json_str`] otherwise.
    pub fn from_reader(reader: impl Read) -> Result<Self, TopologyError> {
        let raw: RawDocument = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    /// Parses and validates a topology document held in memory.
    ///
    /// # Errors
    /// Returns [`TopologyError`] when the JSON is malformed, the node list is
    /// empty or repeats an id, metadata uses a reserved field, an edge names
    /// an unknown node or conflicts with an earlier edge, both or neither
    /// edge forms are present, or the latencies fail matrix validation.
    pub fn from_json_str(text: &str) -> Result<Self, TopologyError> {
        let raw: RawDocument = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    #[instrument(
        name = "topology.load",
        err,
        skip_all,
        fields(nodes = raw.nodes.len(), form = field::Empty),
    )]
    fn from_raw(raw: RawDocument) -> Result<Self, TopologyError> {
        let RawDocument {
            nodes,
            edges,
            matrix,
        } = raw;
        if nodes.is_empty() {
            return Err(TopologyError::EmptyNodes);
        }
        let index = index_nodes(&nodes)?;
        let span = Span::current();
        let distances = match (edges, matrix) {
            (Some(_), Some(_)) => return Err(TopologyError::BothEdgeForms),
            (None, None) => return Err(TopologyError::NoEdgeForm),
            (Some(edges), None) => {
                span.record("form", "edges");
                matrix_from_edges(&nodes, &index, &edges)?
            }
            (None, Some(rows)) => {
                span.record("form", "matrix");
                matrix_from_rows(nodes.len(), &rows)?
            }
        };
        drop(index);
        info!(
            nodes = nodes.len(),
            edges = distances.edge_count(),
            "topology loaded"
        );
        Ok(Self {
            nodes,
            matrix: distances,
        })
    }

    /// Returns the number of nodes.
    #[rustfmt::skip]
    #[must_use]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns `true` when the topology has no nodes.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns the nodes in document order.
    #[rustfmt::skip]
    #[must_use]
    pub fn nodes(&self) -> &[NodeRecord] { &self.nodes }

    /// Returns the latency matrix indexed by document position.
    #[rustfmt::skip]
    #[must_use]
    pub fn matrix(&self) -> &DistanceMatrix { &self.matrix }

    /// Returns the id of the node at `index`.
    #[must_use]
    pub fn id(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(|node| node.id.as_str())
    }

    /// Returns the document position of the node called `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }
}

fn index_nodes(nodes: &[NodeRecord]) -> Result<HashMap<&str, usize>, TopologyError> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        if let Some(&reserved) = RESERVED_FIELDS
            .iter()
            .find(|name| node.metadata.contains_key(**name))
        {
            return Err(TopologyError::ReservedField {
                id: node.id.clone(),
                field: reserved,
            });
        }
        match index.entry(node.id.as_str()) {
            Entry::Occupied(_) => {
                return Err(TopologyError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(position);
            }
        }
    }
    Ok(index)
}

fn matrix_from_edges(
    nodes: &[NodeRecord],
    index: &HashMap<&str, usize>,
    edges: &[RawEdge],
) -> Result<DistanceMatrix, TopologyError> {
    let lookup = |edge: usize, id: &str| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| TopologyError::UnknownEndpoint {
                edge,
                id: id.to_owned(),
            })
    };
    let mut resolved = Vec::with_capacity(edges.len());
    for (position, edge) in edges.iter().enumerate() {
        resolved.push((
            lookup(position, &edge.source)?,
            lookup(position, &edge.target)?,
            edge.latency,
        ));
    }
    DistanceMatrix::from_edges(nodes.len(), resolved).map_err(|err| match err {
        MatrixError::ConflictingEdge { left, right } => TopologyError::ConflictingEdge {
            source_id: node_label(nodes, left),
            target_id: node_label(nodes, right),
        },
        other => TopologyError::Matrix(other),
    })
}

fn matrix_from_rows(
    nodes: usize,
    rows: &[Vec<Option<f32>>],
) -> Result<DistanceMatrix, TopologyError> {
    if rows.len() != nodes {
        return Err(TopologyError::MatrixShape {
            rows: rows.len(),
            nodes,
        });
    }
    Ok(DistanceMatrix::from_dense(rows)?)
}

fn node_label(nodes: &[NodeRecord], index: usize) -> String {
    nodes
        .get(index)
        .map_or_else(|| index.to_string(), |node| node.id.clone())
}
