//! # Outbound Ports
//!
//! Persistence dependency of the Trust Graph.

use crate::domain::TrustEdge;
use async_trait::async_trait;
use shared_types::{Reconnect, StoreError};

/// Trust edge persistence - outbound port.
///
/// Implementations must return `StoreError::Disconnected` for a lost
/// connection so callers can reconnect and retry once.
#[async_trait]
pub trait TrustStore: Reconnect {
    /// All stored edges, ordered by source.
    async fn read_edges(&self) -> Result<Vec<TrustEdge>, StoreError>;

    /// Insert the edge if absent.
    async fn upsert_edge(&self, edge: TrustEdge) -> Result<(), StoreError>;

    /// Delete the edge if present.
    async fn delete_edge(&self, edge: TrustEdge) -> Result<(), StoreError>;
}
