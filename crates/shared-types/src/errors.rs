//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors surfaced by persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Connection to the backing store was lost. Retried once after reconnecting.
    #[error("Store disconnected: {0}")]
    Disconnected(String),

    /// Query failed for a non-transient reason.
    #[error("Store query failed: {0}")]
    Query(String),

    /// The single retry after reconnecting also failed.
    #[error("Error when retrying {operation} after reconnect: {reason}")]
    RetryFailed {
        /// Operation that was retried.
        operation: String,
        /// Failure of the retry (or of the reconnect itself).
        reason: String,
    },
}

impl StoreError {
    /// True if the caller may reconnect and retry once.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Disconnected(_))
    }
}

/// Errors surfaced by the chat-platform collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Referenced entity (node, channel, member, message) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The bot lacks the platform permission needed for the call.
    #[error("Missing permissions: {0}")]
    Forbidden(String),

    /// Any other remote failure.
    #[error("Remote call failed: {0}")]
    Remote(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_disconnect_is_transient() {
        assert!(StoreError::Disconnected("reset".into()).is_transient());
        assert!(!StoreError::Query("syntax".into()).is_transient());
        assert!(!StoreError::RetryFailed {
            operation: "read_edges".into(),
            reason: "reset".into(),
        }
        .is_transient());
    }

    #[test]
    fn test_error_messages() {
        let err = StoreError::RetryFailed {
            operation: "upsert_edge".into(),
            reason: "timeout".into(),
        };
        assert!(err.to_string().contains("upsert_edge"));
        assert!(PlatformError::Forbidden("ban".into())
            .to_string()
            .contains("Missing permissions"));
    }
}
