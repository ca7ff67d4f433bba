//! # Domain Errors
//!
//! Error types for the Trust Graph.

use shared_types::{NodeId, StoreError};
use thiserror::Error;

/// Trust graph error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrustError {
    /// Self-trust is implicit and cannot be stored or removed.
    #[error("Node {0} implicitly trusts itself; reflexive edges cannot be changed")]
    ReflexiveEdge(NodeId),

    /// Persistence failed; the in-memory indices were not touched.
    #[error("Trust store error: {0}")]
    Store(#[from] StoreError),

    /// Edge was present in only one of the two indices.
    #[error("Trust index divergence: edge {truster} -> {trusted} present only in {present_in} index")]
    IndexDivergence {
        /// Edge source (the trusting node).
        truster: NodeId,
        /// Edge destination (the trusted node).
        trusted: NodeId,
        /// Index that still held the edge.
        present_in: &'static str,
    },

    /// A previous divergence was detected; mutations are refused.
    #[error("Trust graph is poisoned by an earlier index divergence")]
    Poisoned,
}

impl TrustError {
    /// True for internal-consistency failures that must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TrustError::IndexDivergence { .. } | TrustError::Poisoned
        )
    }
}
