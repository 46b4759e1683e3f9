//! Error types for the editor core.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Be serializable for surfacing in the editing UI
//! - Include actionable information (which node, what to fix)
//! - Keep the taxonomy the submission path depends on explicit:
//!   validation and busy checks fail before the network, transport and
//!   processing failures abort reconciliation entirely

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a node in the graph.
///
/// IDs are assigned by the graph's own [`IdGenerator`](crate::graph::IdGenerator)
/// from a monotonic counter, so two graph sessions never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Build the id for the `n`-th node created in a graph.
    pub fn from_index(index: u64) -> Self {
        Self(format!("node_{index}"))
    }

    /// The raw string form used on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for an edge in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Build the id for the `n`-th edge created in a graph.
    pub fn from_index(index: u64) -> Self {
        Self(format!("edge_{index}"))
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level error type for the editor core.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum PixelGraphError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Validation(ValidationReport),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to graph structure and mutation.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Update targets a {expected} payload but node {node_id} is {actual}")]
    PayloadKindMismatch {
        node_id: NodeId,
        expected: String,
        actual: String,
    },
}

/// Pre-submission validation failures for raw-image inputs.
///
/// These are collected exhaustively across every raw reader node into a
/// [`ValidationReport`] so the user can fix all problems in one pass.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Node {node_id}: no image data loaded")]
    MissingImage { node_id: NodeId },

    #[error("Node {node_id}: invalid {dimension} {value}")]
    InvalidDimension {
        node_id: NodeId,
        dimension: Dimension,
        value: u32,
    },

    #[error("Node {node_id}: image data is empty")]
    EmptyImage { node_id: NodeId },

    #[error("Node {node_id}: dimensions declare {expected} pixels but the buffer holds {actual}")]
    DimensionMismatch {
        node_id: NodeId,
        expected: usize,
        actual: usize,
    },
}

/// Which image axis an [`ValidationError::InvalidDimension`] points at.
///
/// Each failing axis is reported separately so the aggregate report counts
/// one violation per problem, not one per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => write!(f, "width"),
            Dimension::Height => write!(f, "height"),
        }
    }
}

impl ValidationError {
    /// The node this violation points at.
    pub fn node_id(&self) -> &NodeId {
        match self {
            ValidationError::MissingImage { node_id }
            | ValidationError::InvalidDimension { node_id, .. }
            | ValidationError::EmptyImage { node_id }
            | ValidationError::DimensionMismatch { node_id, .. } => node_id,
        }
    }

    /// Get a suggestion for fixing this error.
    pub fn suggested_fix(&self) -> &'static str {
        match self {
            ValidationError::MissingImage { .. } => "Load a raw or image file into the node",
            ValidationError::InvalidDimension { .. } => "Width and height must both be positive",
            ValidationError::EmptyImage { .. } => "The loaded file produced no pixels; reload it",
            ValidationError::DimensionMismatch { .. } => {
                "Adjust width/height to match the loaded pixel count"
            }
        }
    }
}

/// Errors from the exchange with the remote processing service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service was unreachable or the exchange failed below HTTP.
    #[error("Transport failure: {0}")]
    Transport(#[source] Box<ureq::Error>),

    /// The service executed the graph and reported a domain failure.
    /// The message is surfaced verbatim.
    #[error("Processing failed: {0}")]
    Processing(String),

    /// A second submission was attempted while one is in flight.
    #[error("A submission is already in progress")]
    Busy,

    /// The response body could not be decoded.
    #[error("Malformed response from service: {0}")]
    Decode(#[source] std::io::Error),
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

/// Result type alias for core operations.
pub type PixelGraphResult<T> = Result<T, PixelGraphError>;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

// ============================================================================
// Validation Report
// ============================================================================

/// Aggregate pre-submission report.
///
/// Validation is exhaustive, not fail-fast: every violation across every raw
/// reader node lands here, and a non-empty report aborts submission before
/// any request is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All violations found, in node order.
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a violation to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Whether the graph may be submitted.
    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the report holds no violations.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Detailed messages with fix suggestions, one per violation.
    pub fn detailed_errors(&self) -> Vec<String> {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, error)| format!("{}. {} ({})", i + 1, error, error.suggested_fix()))
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.can_submit() {
            write!(f, "Inputs are valid and ready to submit")
        } else {
            write!(f, "Validation failed with {} error(s)", self.errors.len())
        }
    }
}
