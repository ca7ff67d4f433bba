//! # Domain Errors

use shared_types::{NodeId, StoreError};
use thiserror::Error;

/// Registry error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Persisting or loading failed.
    #[error("Registry store error: {0}")]
    Store(#[from] StoreError),

    /// The main node is always whitelisted and cannot be removed.
    #[error("Server {0} is the main server and cannot be removed from the whitelist")]
    MainNode(NodeId),
}
