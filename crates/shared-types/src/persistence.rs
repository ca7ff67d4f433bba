//! # Reconnect-on-Disconnect Wrapper
//!
//! Every persistence port exposes `reconnect()`. Operations are run through
//! [`with_reconnect`]: a transient disconnect triggers one reconnect and one
//! retry, any other failure is returned unchanged.

use crate::errors::StoreError;
use async_trait::async_trait;
use std::future::Future;
use tracing::warn;

/// A persistence backend that can re-establish its connection.
#[async_trait]
pub trait Reconnect: Send + Sync {
    /// Re-establish the connection to the backing store.
    async fn reconnect(&self) -> Result<(), StoreError>;
}

/// Run `op`, reconnecting and retrying once if it fails with a transient disconnect.
pub async fn with_reconnect<R, T, F, Fut>(
    store: &R,
    operation: &str,
    mut op: F,
) -> Result<T, StoreError>
where
    R: Reconnect + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    match op().await {
        Err(e) if e.is_transient() => {
            warn!(
                operation,
                error = %e,
                "[store] Connection lost, reconnecting and retrying once"
            );
            let retry_failed = |reason: String| StoreError::RetryFailed {
                operation: operation.to_string(),
                reason,
            };
            store
                .reconnect()
                .await
                .map_err(|e| retry_failed(e.to_string()))?;
            op().await.map_err(|e| retry_failed(e.to_string()))
        }
        other => other,
    }
}
