//! # In-Memory Registry Stores
//!
//! Default storage backend and test doubles. `disconnect_next(n)` makes the
//! next `n` calls fail with a transient disconnect.

use crate::domain::NodeSettings;
use crate::ports::{SettingsStore, WhitelistStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{NodeId, Reconnect, StoreError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Connection {
    pending_disconnects: AtomicUsize,
    reconnects: AtomicUsize,
}

impl Connection {
    fn check(&self) -> Result<(), StoreError> {
        let disconnected = self
            .pending_disconnects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if disconnected {
            return Err(StoreError::Disconnected("connection reset by peer".into()));
        }
        Ok(())
    }
}

/// In-memory whitelist store.
#[derive(Default)]
pub struct InMemoryWhitelistStore {
    nodes: RwLock<BTreeSet<NodeId>>,
    connection: Connection,
}

impl InMemoryWhitelistStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `nodes`.
    pub fn with_nodes(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let store = Self::default();
        store.nodes.write().extend(nodes);
        store
    }

    /// Make the next `n` calls fail with `StoreError::Disconnected`.
    pub fn disconnect_next(&self, n: usize) {
        self.connection.pending_disconnects.store(n, Ordering::SeqCst);
    }

    /// Number of reconnects.
    pub fn reconnect_count(&self) -> usize {
        self.connection.reconnects.load(Ordering::SeqCst)
    }

    /// Stored node ids.
    pub fn snapshot(&self) -> Vec<NodeId> {
        self.nodes.read().iter().copied().collect()
    }
}

#[async_trait]
impl Reconnect for InMemoryWhitelistStore {
    async fn reconnect(&self) -> Result<(), StoreError> {
        self.connection.reconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl WhitelistStore for InMemoryWhitelistStore {
    async fn read_nodes(&self) -> Result<Vec<NodeId>, StoreError> {
        self.connection.check()?;
        Ok(self.snapshot())
    }

    async fn insert_node(&self, node: NodeId) -> Result<(), StoreError> {
        self.connection.check()?;
        self.nodes.write().insert(node);
        Ok(())
    }

    async fn delete_node(&self, node: NodeId) -> Result<(), StoreError> {
        self.connection.check()?;
        self.nodes.write().remove(&node);
        Ok(())
    }
}

/// In-memory node settings store.
#[derive(Default)]
pub struct InMemorySettingsStore {
    rows: RwLock<BTreeMap<NodeId, NodeSettings>>,
    connection: Connection,
}

impl InMemorySettingsStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` calls fail with `StoreError::Disconnected`.
    pub fn disconnect_next(&self, n: usize) {
        self.connection.pending_disconnects.store(n, Ordering::SeqCst);
    }

    /// Stored row of `node`.
    pub fn row(&self, node: NodeId) -> Option<NodeSettings> {
        self.rows.read().get(&node).copied()
    }
}

#[async_trait]
impl Reconnect for InMemorySettingsStore {
    async fn reconnect(&self) -> Result<(), StoreError> {
        self.connection.reconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn read_all(&self) -> Result<Vec<NodeSettings>, StoreError> {
        self.connection.check()?;
        Ok(self.rows.read().values().copied().collect())
    }

    async fn upsert(&self, settings: NodeSettings) -> Result<(), StoreError> {
        self.connection.check()?;
        self.rows.write().insert(settings.node, settings);
        Ok(())
    }
}
