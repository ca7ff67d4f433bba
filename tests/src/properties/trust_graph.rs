//! # Trust Graph Properties
//!
//! Random sequences of trust mutations checked against a plain edge-set
//! model.
//!
//! | Property | Check |
//! |----------|-------|
//! | Model agreement | `trusts` matches the model for every pair |
//! | Symmetry | `s` in `backward[d]` iff `d` in `forward[s]` |
//! | Self-trust | both queries always contain the queried node |
//! | Durability | reloading from the same store rebuilds identical indices |

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use gb_01_trust_graph::{
        invariant_implicit_self_trust, invariant_index_symmetry, InMemoryTrustStore, TrustApi,
        TrustError, TrustGraph,
    };
    use proptest::prelude::*;
    use shared_types::NodeId;

    const NODES: u64 = 8;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn ops() -> impl Strategy<Value = Vec<(u64, u64, bool)>> {
        prop::collection::vec((0u64..NODES, 0u64..NODES, any::<bool>()), 0..64)
    }

    proptest! {
        #[test]
        fn prop_graph_matches_edge_set_model(ops in ops()) {
            let rt = runtime();
            let store = Arc::new(InMemoryTrustStore::new());
            let graph = rt.block_on(TrustGraph::load(store.clone())).unwrap();
            let mut model: HashSet<(u64, u64)> = HashSet::new();

            for (s, d, trust) in ops {
                let result = rt.block_on(graph.set_trust(NodeId(s), NodeId(d), trust));
                if s == d {
                    prop_assert!(matches!(result, Err(TrustError::ReflexiveEdge(_))));
                    continue;
                }
                prop_assert!(result.is_ok());
                if trust {
                    model.insert((s, d));
                } else {
                    model.remove(&(s, d));
                }
            }

            for s in 0..NODES {
                for d in 0..NODES {
                    let expected = s == d || model.contains(&(s, d));
                    prop_assert_eq!(graph.trusts(NodeId(s), NodeId(d)), expected);
                }
            }
            prop_assert_eq!(graph.edge_count(), model.len());
            prop_assert!(!graph.is_poisoned());

            let snapshot = graph.snapshot();
            prop_assert!(invariant_index_symmetry(&snapshot));

            let reloaded = rt.block_on(TrustGraph::load(store)).unwrap();
            prop_assert_eq!(reloaded.snapshot(), snapshot);
        }

        #[test]
        fn prop_queries_include_queried_node(ops in ops(), queried in 0u64..NODES) {
            let rt = runtime();
            let graph = rt
                .block_on(TrustGraph::load(Arc::new(InMemoryTrustStore::new())))
                .unwrap();
            for (s, d, trust) in ops {
                let _ = rt.block_on(graph.set_trust(NodeId(s), NodeId(d), trust));
            }

            let node = NodeId(queried);
            let trusted_by = graph.trusted_by(node);
            let who_trusts = graph.who_trusts(node);
            prop_assert!(invariant_implicit_self_trust(node, &trusted_by));
            prop_assert!(invariant_implicit_self_trust(node, &who_trusts));

            for other in trusted_by.iter().filter(|n| **n != node) {
                prop_assert!(graph.who_trusts(*other).contains(&node));
            }
        }
    }
}
