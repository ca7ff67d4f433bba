//! # Domain Errors
//!
//! Step failures inside one target's handler. They are reported to the
//! operational error channel and reduced to an outcome; they never cross
//! the handler boundary.

use gb_01_trust_graph::TrustError;
use gb_03_authorization::AuthorizationError;
use shared_types::{NodeId, PlatformError};
use std::time::Duration;
use thiserror::Error;

/// Propagation error types.
#[derive(Debug, Clone, Error)]
pub enum PropagationError {
    /// The node is not known to the platform.
    #[error("Cannot find server from ID {0}")]
    NodeNotFound(NodeId),

    /// Looking up the node failed.
    #[error("Failed to look up server {node}: {source}")]
    LookupFailed {
        /// Target node.
        node: NodeId,
        /// Platform failure.
        source: PlatformError,
    },

    /// The moderation action failed.
    #[error("Failed to apply ban on server {node}: {source}")]
    ActionFailed {
        /// Target node.
        node: NodeId,
        /// Platform failure.
        source: PlatformError,
    },

    /// Posting a notice failed.
    #[error("Failed to post notice on server {node}: {source}")]
    NoticeFailed {
        /// Target node.
        node: NodeId,
        /// Platform failure.
        source: PlatformError,
    },

    /// Replying to or updating an invoked control failed.
    #[error("Failed to update interaction on server {node}: {source}")]
    InteractionFailed {
        /// Node of the interaction.
        node: NodeId,
        /// Platform failure.
        source: PlatformError,
    },

    /// The per-node handler exceeded its time budget.
    #[error("Handler for server {node} timed out after {after:?}")]
    Timeout {
        /// Target node.
        node: NodeId,
        /// Configured budget.
        after: Duration,
    },

    /// Re-authorizing an operator failed.
    #[error("Authorization check failed: {0}")]
    Authorization(#[from] AuthorizationError),

    /// Updating the trust graph failed.
    #[error("Trust update failed: {0}")]
    Trust(#[from] TrustError),
}

impl PropagationError {
    /// True for failures that must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PropagationError::Trust(e) if e.is_fatal())
    }
}
