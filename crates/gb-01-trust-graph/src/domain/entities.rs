//! # Domain Entities
//!
//! Trust edges and the forward/backward adjacency indices.

use super::errors::TrustError;
use shared_types::NodeId;
use std::collections::{HashMap, HashSet};

/// Directed trust relation: `source` pre-authorizes moderation actions
/// issued from `destination`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrustEdge {
    /// Node granting trust.
    pub source: NodeId,
    /// Node being trusted.
    pub destination: NodeId,
}

impl TrustEdge {
    /// Create a new edge.
    pub fn new(source: NodeId, destination: NodeId) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// True for `(n, n)`. Self-trust is implicit and never stored.
    pub fn is_reflexive(&self) -> bool {
        self.source == self.destination
    }
}

/// Adjacency indices of the trust graph.
///
/// `forward[s]` holds every `d` that `s` trusts; `backward[d]` holds every
/// `s` that trusts `d`. Nodes without edges have no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrustIndices {
    /// Source -> destinations it trusts.
    pub forward: HashMap<NodeId, HashSet<NodeId>>,
    /// Destination -> sources that trust it.
    pub backward: HashMap<NodeId, HashSet<NodeId>>,
}

impl TrustIndices {
    /// Nodes trusted by `node`, excluding implicit self-trust.
    pub fn trusted_by(&self, node: NodeId) -> Option<&HashSet<NodeId>> {
        self.forward.get(&node)
    }

    /// Nodes that trust `node`, excluding implicit self-trust.
    pub fn who_trusts(&self, node: NodeId) -> Option<&HashSet<NodeId>> {
        self.backward.get(&node)
    }

    /// True if `edge` is stored in the forward index.
    pub fn contains(&self, edge: &TrustEdge) -> bool {
        self.forward
            .get(&edge.source)
            .is_some_and(|dests| dests.contains(&edge.destination))
    }

    /// Number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(HashSet::len).sum()
    }

    /// Add `edge` to both indices. Returns false if it was already present.
    pub fn insert(&mut self, edge: TrustEdge) -> bool {
        let added_forward = self
            .forward
            .entry(edge.source)
            .or_default()
            .insert(edge.destination);
        let added_backward = self
            .backward
            .entry(edge.destination)
            .or_default()
            .insert(edge.source);
        added_forward || added_backward
    }

    /// Remove `edge` from both indices.
    ///
    /// Returns `Ok(false)` if the edge was in neither index. An edge found in
    /// exactly one index is an internal-consistency violation; in that case the
    /// indices are left untouched and `IndexDivergence` is returned.
    pub fn remove(&mut self, edge: TrustEdge) -> Result<bool, TrustError> {
        let in_forward = self
            .forward
            .get(&edge.source)
            .is_some_and(|dests| dests.contains(&edge.destination));
        let in_backward = self
            .backward
            .get(&edge.destination)
            .is_some_and(|sources| sources.contains(&edge.source));

        match (in_forward, in_backward) {
            (false, false) => Ok(false),
            (true, true) => {
                remove_from(&mut self.forward, edge.source, edge.destination);
                remove_from(&mut self.backward, edge.destination, edge.source);
                Ok(true)
            }
            (in_forward, _) => Err(TrustError::IndexDivergence {
                truster: edge.source,
                trusted: edge.destination,
                present_in: if in_forward { "forward" } else { "backward" },
            }),
        }
    }
}

fn remove_from(index: &mut HashMap<NodeId, HashSet<NodeId>>, key: NodeId, value: NodeId) {
    if let Some(set) = index.get_mut(&key) {
        set.remove(&value);
        if set.is_empty() {
            index.remove(&key);
        }
    }
}
