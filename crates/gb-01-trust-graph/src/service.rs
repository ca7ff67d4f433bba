//! # Trust Graph Service
//!
//! Owns the forward/backward indices behind a single `RwLock` and the
//! persistence port. Every mutation is persisted (with one reconnect retry)
//! before the lock is taken, and the lock is never held across an await.

use crate::algorithms::build_indices;
use crate::domain::{TrustEdge, TrustError, TrustIndices};
use crate::ports::{TrustApi, TrustStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{with_reconnect, NodeId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// In-memory directed trust graph backed by a [`TrustStore`].
pub struct TrustGraph {
    store: Arc<dyn TrustStore>,
    indices: RwLock<TrustIndices>,
    poisoned: AtomicBool,
}

impl TrustGraph {
    /// Load every stored edge and build both indices.
    pub async fn load(store: Arc<dyn TrustStore>) -> Result<Self, TrustError> {
        let edges = with_reconnect(store.as_ref(), "read_edges", || store.read_edges()).await?;
        let stored = edges.len();
        let indices = build_indices(edges);

        info!(
            edges = stored,
            sources = indices.forward.len(),
            "[gb-01] Trust graph loaded"
        );

        Ok(Self {
            store,
            indices: RwLock::new(indices),
            poisoned: AtomicBool::new(false),
        })
    }

    /// Number of stored (non-reflexive) edges.
    pub fn edge_count(&self) -> usize {
        self.indices.read().edge_count()
    }

    /// True once an index divergence has been detected.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::SeqCst)
    }

    /// Copy of the current indices.
    pub fn snapshot(&self) -> TrustIndices {
        self.indices.read().clone()
    }

    async fn add_edge(&self, edge: TrustEdge) -> Result<(), TrustError> {
        with_reconnect(self.store.as_ref(), "upsert_edge", || {
            self.store.upsert_edge(edge)
        })
        .await?;

        let added = self.indices.write().insert(edge);
        debug!(
            source = %edge.source,
            destination = %edge.destination,
            added,
            "[gb-01] Trust edge set"
        );
        Ok(())
    }

    async fn remove_edge(&self, edge: TrustEdge) -> Result<(), TrustError> {
        with_reconnect(self.store.as_ref(), "delete_edge", || {
            self.store.delete_edge(edge)
        })
        .await?;

        let removed = self.indices.write().remove(edge);
        match removed {
            Ok(removed) => {
                debug!(
                    source = %edge.source,
                    destination = %edge.destination,
                    removed,
                    "[gb-01] Trust edge cleared"
                );
                Ok(())
            }
            Err(e) => {
                self.poisoned.store(true, Ordering::SeqCst);
                error!(error = %e, "[gb-01] Trust indices diverged, refusing further mutations");
                Err(e)
            }
        }
    }

    #[cfg(test)]
    fn with_indices(store: Arc<dyn TrustStore>, indices: TrustIndices) -> Self {
        Self {
            store,
            indices: RwLock::new(indices),
            poisoned: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl TrustApi for TrustGraph {
    fn trusted_by(&self, node: NodeId) -> HashSet<NodeId> {
        let mut result = self
            .indices
            .read()
            .trusted_by(node)
            .cloned()
            .unwrap_or_default();
        result.insert(node);
        result
    }

    fn who_trusts(&self, node: NodeId) -> HashSet<NodeId> {
        let mut result = self
            .indices
            .read()
            .who_trusts(node)
            .cloned()
            .unwrap_or_default();
        result.insert(node);
        result
    }

    fn trusts(&self, source: NodeId, destination: NodeId) -> bool {
        source == destination
            || self
                .indices
                .read()
                .contains(&TrustEdge::new(source, destination))
    }

    async fn set_trust(
        &self,
        source: NodeId,
        destination: NodeId,
        trust: bool,
    ) -> Result<(), TrustError> {
        if self.is_poisoned() {
            return Err(TrustError::Poisoned);
        }
        let edge = TrustEdge::new(source, destination);
        if edge.is_reflexive() {
            return Err(TrustError::ReflexiveEdge(source));
        }

        if trust {
            self.add_edge(edge).await
        } else {
            self.remove_edge(edge).await
        }
    }
}
