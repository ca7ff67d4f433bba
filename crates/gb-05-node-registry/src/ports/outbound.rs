//! # Outbound Ports
//!
//! Persistence of the whitelist and node settings. Both expose `reconnect`
//! through [`Reconnect`] and are called through `with_reconnect`.

use crate::domain::NodeSettings;
use async_trait::async_trait;
use shared_types::{NodeId, Reconnect, StoreError};

/// Whitelist persistence - outbound port.
#[async_trait]
pub trait WhitelistStore: Reconnect {
    /// Every stored node id.
    async fn read_nodes(&self) -> Result<Vec<NodeId>, StoreError>;

    /// Store `node`. Idempotent.
    async fn insert_node(&self, node: NodeId) -> Result<(), StoreError>;

    /// Delete `node`. Deleting a missing node is not an error.
    async fn delete_node(&self, node: NodeId) -> Result<(), StoreError>;
}

/// Node settings persistence - outbound port.
#[async_trait]
pub trait SettingsStore: Reconnect {
    /// Every stored settings row.
    async fn read_all(&self) -> Result<Vec<NodeSettings>, StoreError>;

    /// Insert or replace the row of `settings.node`.
    async fn upsert(&self, settings: NodeSettings) -> Result<(), StoreError>;
}
