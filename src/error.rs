use crate::graph::NodeId;
use thiserror::Error;

/// Errors raised by tensors, the graph engine and the layers built on top of them.
#[derive(Debug, Error)]
pub enum QuorumError {
    /// Invalid constructor arguments. Always fatal to the layer being constructed.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes {lhs:?} and {rhs:?}")]
    BroadcastMismatch { lhs: Vec<usize>, rhs: Vec<usize> },

    #[error("Layer {0} has not been built yet")]
    NotBuilt(String),

    #[error("Node {0} not found in the computation graph")]
    NodeNotFound(NodeId),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QuorumError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        QuorumError::Configuration(message.into())
    }

    pub(crate) fn shape(expected: &[usize], actual: &[usize], operation: &str) -> Self {
        QuorumError::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
            operation: operation.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuorumError>;
