//! # Fan-Out Under Load
//!
//! Handlers with random latency on a multi-threaded runtime. Every target
//! must be invoked exactly once and appear exactly once in the result.

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;

    use gb_02_fan_out::FanOutExecutor;
    use parking_lot::Mutex;
    use rand::Rng;
    use shared_types::NodeId;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_target_invoked_exactly_once() {
        let targets: Vec<NodeId> = (1..=64).map(NodeId).collect();
        let delays: HashMap<NodeId, u64> = {
            let mut rng = rand::thread_rng();
            targets
                .iter()
                .map(|n| (*n, rng.gen_range(0..25)))
                .collect()
        };
        let delays = Arc::new(delays);
        let invocations = Arc::new(Mutex::new(HashMap::<NodeId, usize>::new()));

        let results = {
            let invocations = invocations.clone();
            FanOutExecutor::new(targets.iter().copied())
                .run(move |node| {
                    let delay = delays[&node];
                    let invocations = invocations.clone();
                    async move {
                        *invocations.lock().entry(node).or_default() += 1;
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        node.get() * 10
                    }
                })
                .await
        };

        let expected: HashSet<NodeId> = targets.iter().copied().collect();
        assert_eq!(results.keys().copied().collect::<HashSet<_>>(), expected);
        for (node, value) in &results {
            assert_eq!(*value, node.get() * 10);
        }
        let invocations = invocations.lock();
        assert_eq!(invocations.len(), targets.len());
        assert!(invocations.values().all(|count| *count == 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_duplicate_targets_dispatched_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let results = {
            let calls = calls.clone();
            FanOutExecutor::new([NodeId(3), NodeId(1), NodeId(3), NodeId(2), NodeId(1)])
                .run(move |node| {
                    let calls = calls.clone();
                    async move {
                        calls.lock().push(node);
                    }
                })
                .await
        };

        assert_eq!(results.len(), 3);
        let mut calls = calls.lock().clone();
        calls.sort();
        assert_eq!(calls, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_panicking_handler_leaves_gap_only_for_its_node() {
        let results = FanOutExecutor::new((1..=8).map(NodeId))
            .run(|node| async move {
                if node == NodeId(5) {
                    panic!("handler for {} crashed", node);
                }
                let jitter = rand::thread_rng().gen_range(0..10);
                tokio::time::sleep(Duration::from_millis(jitter)).await;
                true
            })
            .await;

        assert_eq!(results.len(), 7);
        assert!(!results.contains_key(&NodeId(5)));
        assert!(results.values().all(|ok| *ok));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_handlers_run_concurrently() {
        let started = std::time::Instant::now();
        let results = FanOutExecutor::new((1..=16).map(NodeId))
            .run(|_| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
            })
            .await;

        assert_eq!(results.len(), 16);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
