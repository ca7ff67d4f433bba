//! # Index Construction
//!
//! Builds both adjacency indices from the persisted edge list in two
//! linear grouping passes over pre-sorted input:
//!
//! 1. Sort by source (the store already returns this order), group runs of
//!    equal sources into `forward`.
//! 2. Re-sort by destination, group runs of equal destinations into `backward`.
//!
//! Each key is inserted into its map exactly once.

use crate::domain::{TrustEdge, TrustIndices};
use shared_types::NodeId;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Group a sequence of `(key, value)` pairs that is sorted by key.
///
/// Runs of equal keys are collected into one set. Input that is not sorted
/// still produces a correct map, but later runs of an already-seen key are
/// merged through an extra lookup.
pub fn group_sorted<I>(pairs: I) -> HashMap<NodeId, HashSet<NodeId>>
where
    I: IntoIterator<Item = (NodeId, NodeId)>,
{
    let mut index: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
    let mut current: Option<(NodeId, HashSet<NodeId>)> = None;

    for (key, value) in pairs {
        if let Some((run_key, run)) = current.as_mut() {
            if *run_key == key {
                run.insert(value);
                continue;
            }
        }
        if let Some((run_key, run)) = current.replace((key, HashSet::from([value]))) {
            index.entry(run_key).or_default().extend(run);
        }
    }
    if let Some((run_key, run)) = current {
        index.entry(run_key).or_default().extend(run);
    }

    index
}

/// Build forward and backward indices from the persisted edge list.
///
/// Reflexive edges are skipped: self-trust is implicit.
pub fn build_indices(mut edges: Vec<TrustEdge>) -> TrustIndices {
    let before = edges.len();
    edges.retain(|e| !e.is_reflexive());
    if edges.len() != before {
        warn!(
            skipped = before - edges.len(),
            "[gb-01] Ignoring stored reflexive trust edges"
        );
    }

    if !edges.windows(2).all(|w| w[0].source <= w[1].source) {
        edges.sort_unstable_by_key(|e| e.source);
    }
    let forward = group_sorted(edges.iter().map(|e| (e.source, e.destination)));

    edges.sort_unstable_by_key(|e| e.destination);
    let backward = group_sorted(edges.iter().map(|e| (e.destination, e.source)));

    TrustIndices { forward, backward }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariant_index_symmetry;

    fn edges(pairs: &[(u64, u64)]) -> Vec<TrustEdge> {
        pairs
            .iter()
            .map(|(s, d)| TrustEdge::new(NodeId(*s), NodeId(*d)))
            .collect()
    }

    #[test]
    fn test_group_sorted_runs() {
        let grouped = group_sorted(vec![
            (NodeId(1), NodeId(2)),
            (NodeId(1), NodeId(3)),
            (NodeId(2), NodeId(1)),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&NodeId(1)], HashSet::from([NodeId(2), NodeId(3)]));
        assert_eq!(grouped[&NodeId(2)], HashSet::from([NodeId(1)]));
    }

    #[test]
    fn test_group_unsorted_input_merges() {
        let grouped = group_sorted(vec![
            (NodeId(1), NodeId(2)),
            (NodeId(2), NodeId(1)),
            (NodeId(1), NodeId(3)),
        ]);
        assert_eq!(grouped[&NodeId(1)], HashSet::from([NodeId(2), NodeId(3)]));
    }

    #[test]
    fn test_build_indices_is_symmetric() {
        let indices = build_indices(edges(&[(1, 2), (1, 3), (2, 3), (4, 1)]));
        assert!(invariant_index_symmetry(&indices));
        assert_eq!(indices.edge_count(), 4);
        assert_eq!(
            indices.who_trusts(NodeId(3)),
            Some(&HashSet::from([NodeId(1), NodeId(2)]))
        );
    }

    #[test]
    fn test_build_skips_reflexive_and_duplicates() {
        let indices = build_indices(edges(&[(1, 1), (1, 2), (1, 2)]));
        assert_eq!(indices.edge_count(), 1);
        assert!(indices.trusted_by(NodeId(1)).is_some());
        assert!(!indices.trusted_by(NodeId(1)).unwrap().contains(&NodeId(1)));
    }

    #[test]
    fn test_build_empty() {
        let indices = build_indices(Vec::new());
        assert!(indices.forward.is_empty());
        assert!(indices.backward.is_empty());
    }
}
