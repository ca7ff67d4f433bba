//! # Domain Invariants
//!
//! Consistency rules for the Trust Graph, checked in tests and after bulk loads.

use super::entities::TrustIndices;
use shared_types::NodeId;
use std::collections::HashSet;

/// Invariant: Index symmetry.
///
/// For every `(s, d)`: `d ∈ forward[s]` iff `s ∈ backward[d]`, and neither
/// index holds empty sets.
pub fn invariant_index_symmetry(indices: &TrustIndices) -> bool {
    let forward_ok = indices.forward.iter().all(|(source, dests)| {
        !dests.is_empty()
            && dests.iter().all(|d| {
                indices
                    .backward
                    .get(d)
                    .is_some_and(|sources| sources.contains(source))
            })
    });
    let backward_ok = indices.backward.iter().all(|(dest, sources)| {
        !sources.is_empty()
            && sources.iter().all(|s| {
                indices
                    .forward
                    .get(s)
                    .is_some_and(|dests| dests.contains(dest))
            })
    });
    forward_ok && backward_ok
}

/// Invariant: Implicit self-trust.
///
/// Query results for `node` always contain `node`.
pub fn invariant_implicit_self_trust(node: NodeId, query_result: &HashSet<NodeId>) -> bool {
    query_result.contains(&node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrustEdge;

    #[test]
    fn test_symmetric_indices_pass() {
        let mut indices = TrustIndices::default();
        indices.insert(TrustEdge::new(NodeId(1), NodeId(2)));
        indices.insert(TrustEdge::new(NodeId(3), NodeId(2)));
        assert!(invariant_index_symmetry(&indices));
    }

    #[test]
    fn test_one_sided_entry_fails() {
        let mut indices = TrustIndices::default();
        indices.insert(TrustEdge::new(NodeId(1), NodeId(2)));
        indices
            .backward
            .entry(NodeId(9))
            .or_default()
            .insert(NodeId(8));
        assert!(!invariant_index_symmetry(&indices));
    }

    #[test]
    fn test_empty_set_fails() {
        let mut indices = TrustIndices::default();
        indices.forward.insert(NodeId(1), HashSet::new());
        assert!(!invariant_index_symmetry(&indices));
    }
}
