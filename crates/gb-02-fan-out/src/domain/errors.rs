//! # Domain Errors
//!
//! A handler task that did not complete normally. These never abort the
//! batch; the node is simply absent from the result map.

use shared_types::NodeId;
use thiserror::Error;
use tokio::task::JoinError;

/// Fan-out error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FanOutError {
    /// The per-node handler panicked.
    #[error("Handler for node {node} panicked: {message}")]
    HandlerPanicked {
        /// Target node.
        node: NodeId,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The per-node task was cancelled (runtime shutting down).
    #[error("Handler for node {node} was cancelled")]
    Cancelled {
        /// Target node.
        node: NodeId,
    },
}

impl FanOutError {
    /// Classify a task join failure for `node`.
    pub fn from_join(node: NodeId, err: JoinError) -> Self {
        if err.is_panic() {
            let payload = err.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            FanOutError::HandlerPanicked { node, message }
        } else {
            FanOutError::Cancelled { node }
        }
    }

    /// Node whose handler failed.
    pub fn node(&self) -> NodeId {
        match self {
            FanOutError::HandlerPanicked { node, .. } | FanOutError::Cancelled { node } => *node,
        }
    }
}
