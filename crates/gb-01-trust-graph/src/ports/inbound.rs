//! # Inbound Ports
//!
//! API trait defining what the Trust Graph subsystem can do.

use crate::domain::TrustError;
use async_trait::async_trait;
use shared_types::NodeId;
use std::collections::HashSet;

/// Trust graph API - inbound port.
///
/// Queries are answered from memory and never fail. Mutations persist
/// first and only then update the in-memory indices.
#[async_trait]
pub trait TrustApi: Send + Sync {
    /// Nodes that `node` trusts, plus `node` itself.
    fn trusted_by(&self, node: NodeId) -> HashSet<NodeId>;

    /// Nodes that trust `node`, plus `node` itself.
    fn who_trusts(&self, node: NodeId) -> HashSet<NodeId>;

    /// True if `source` trusts `destination` (always true when equal).
    fn trusts(&self, source: NodeId, destination: NodeId) -> bool;

    /// Add (`trust = true`) or remove (`trust = false`) the edge `source -> destination`.
    async fn set_trust(
        &self,
        source: NodeId,
        destination: NodeId,
        trust: bool,
    ) -> Result<(), TrustError>;
}
