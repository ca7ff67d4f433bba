//! # Domain Errors
//!
//! A denied check is not an error; these cover failures to gather the
//! inputs of a check.

use shared_types::PlatformError;
use thiserror::Error;

/// Authorization error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// Fetching permissions, roles or overrides failed.
    #[error("Failed to fetch authorization data: {0}")]
    Platform(#[from] PlatformError),
}
