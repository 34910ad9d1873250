//! Error types for the canvas engine
//!
//! Connection validation failures are not errors in this sense: they are
//! returned as values (see [`crate::validation::ConnectionError`]). The
//! variants here cover operations that were asked to do something the
//! current graph cannot satisfy.

use thiserror::Error;

use crate::types::NodeKind;

/// Result type alias using CanvasError
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors that can occur in the canvas engine
#[derive(Debug, Error)]
pub enum CanvasError {
    /// No node with this id exists in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A node with this id already exists in the graph
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    /// A payload of the wrong kind was supplied for a node
    #[error("Payload kind mismatch for node '{node_id}': expected {expected}, got {found}")]
    KindMismatch {
        node_id: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// Unknown node kind name
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Unknown template name
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// A batch of edges could not be committed
    #[error("Invalid connection '{edge_id}': {reason}")]
    InvalidConnection { edge_id: String, reason: String },

    /// The edge set contains a cycle
    #[error("Cycle detected in graph")]
    CycleDetected,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression error
    #[error("Compression error: {0}")]
    Compression(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CanvasError {
    /// Create a node-not-found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound(id.into())
    }
}
