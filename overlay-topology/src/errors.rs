use overlay_core::MatrixError;
use thiserror::Error;

/// Fields the overlay document adds to every node; input metadata may not use
/// them.
pub(crate) const RESERVED_FIELDS: [&str; 2] = ["cluster", "neighbors"];

/// Errors raised while reading a topology document or rendering an overlay.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The document was not valid JSON or did not match the expected shape.
    #[error("malformed topology document: {0}")]
    Json(#[from] serde_json::Error),
    /// The document listed no nodes.
    #[error("topology document lists no nodes")]
    EmptyNodes,
    /// Two nodes shared an id.
    #[error("node id `{id}` appears more than once")]
    DuplicateNode {
        /// The repeated id.
        id: String,
    },
    /// Node metadata used a field the overlay document writes itself.
    #[error("node `{id}` uses the reserved field `{field}`")]
    ReservedField {
        /// Node carrying the field.
        id: String,
        /// The reserved field name.
        field: &'static str,
    },
    /// An edge named a node absent from the node list.
    #[error("edge {edge} references unknown node `{id}`")]
    UnknownEndpoint {
        /// Position of the edge in the `edges` list.
        edge: usize,
        /// The unknown id.
        id: String,
    },
    /// The same undirected edge appeared twice with different latencies.
    #[error("edge between `{source_id}` and `{target_id}` is listed with conflicting latencies")]
    ConflictingEdge {
        /// First endpoint.
        source_id: String,
        /// Second endpoint.
        target_id: String,
    },
    /// Both `edges` and `matrix` were supplied.
    #[error("topology document supplies both `edges` and `matrix`")]
    BothEdgeForms,
    /// Neither `edges` nor `matrix` was supplied.
    #[error("topology document supplies neither `edges` nor `matrix`")]
    NoEdgeForm,
    /// The dense matrix did not have one row per node.
    #[error("matrix has {rows} rows but the document lists {nodes} nodes")]
    MatrixShape {
        /// Number of matrix rows.
        rows: usize,
        /// Number of nodes.
        nodes: usize,
    },
    /// The latencies failed distance-matrix validation.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// An overlay plan did not cover the same nodes as the topology.
    #[error("overlay plan covers {plan} nodes but the topology lists {topology}")]
    PlanMismatch {
        /// Node count of the plan.
        plan: usize,
        /// Node count of the topology.
        topology: usize,
    },
}
