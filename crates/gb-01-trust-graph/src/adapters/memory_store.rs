//! # In-Memory Trust Store
//!
//! `TrustStore` backed by an ordered set. Used by tests, by the dry-run
//! runtime and as the default storage backend.
//!
//! Failure injection: `disconnect_next(n)` makes the next `n` calls fail
//! with a transient disconnect, `fail_writes(true)` makes writes fail with a
//! query error.

use crate::domain::TrustEdge;
use crate::ports::TrustStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Reconnect, StoreError};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory trust edge store.
#[derive(Default)]
pub struct InMemoryTrustStore {
    edges: RwLock<BTreeSet<TrustEdge>>,
    pending_disconnects: AtomicUsize,
    fail_writes: AtomicBool,
    reconnects: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryTrustStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `edges`.
    pub fn with_edges(edges: impl IntoIterator<Item = TrustEdge>) -> Self {
        let store = Self::default();
        store.edges.write().extend(edges);
        store
    }

    /// Make the next `n` calls fail with `StoreError::Disconnected`.
    pub fn disconnect_next(&self, n: usize) {
        self.pending_disconnects.store(n, Ordering::SeqCst);
    }

    /// Make every write fail with `StoreError::Query` while set.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful reconnects.
    pub fn reconnect_count(&self) -> usize {
        self.reconnects.load(Ordering::SeqCst)
    }

    /// Number of successful writes (upserts and deletes).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored edges.
    pub fn snapshot(&self) -> Vec<TrustEdge> {
        self.edges.read().iter().copied().collect()
    }

    fn check_connection(&self) -> Result<(), StoreError> {
        let disconnected = self
            .pending_disconnects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if disconnected {
            return Err(StoreError::Disconnected("connection reset by peer".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.check_connection()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Query("write rejected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Reconnect for InMemoryTrustStore {
    async fn reconnect(&self) -> Result<(), StoreError> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl TrustStore for InMemoryTrustStore {
    async fn read_edges(&self) -> Result<Vec<TrustEdge>, StoreError> {
        self.check_connection()?;
        // BTreeSet order is (source, destination).
        Ok(self.snapshot())
    }

    async fn upsert_edge(&self, edge: TrustEdge) -> Result<(), StoreError> {
        self.check_write()?;
        self.edges.write().insert(edge);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_edge(&self, edge: TrustEdge) -> Result<(), StoreError> {
        self.check_write()?;
        self.edges.write().remove(&edge);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
