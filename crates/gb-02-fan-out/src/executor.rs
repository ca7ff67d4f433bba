//! # Fan-Out Executor
//!
//! One spawned task per target, each writing its result into a shared map
//! under a mutex, followed by a join-all barrier.

use crate::domain::FanOutError;
use futures::future::join_all;
use parking_lot::Mutex;
use shared_types::NodeId;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Dispatches a per-node operation to a fixed set of targets.
#[derive(Debug, Clone)]
pub struct FanOutExecutor {
    targets: Vec<NodeId>,
}

impl FanOutExecutor {
    /// Create an executor for `targets`. Duplicates are dropped, first occurrence wins.
    pub fn new(targets: impl IntoIterator<Item = NodeId>) -> Self {
        let mut seen = HashSet::new();
        let targets = targets.into_iter().filter(|n| seen.insert(*n)).collect();
        Self { targets }
    }

    /// Deduplicated target list.
    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    /// Run `handler` once per target and wait for all of them.
    ///
    /// The returned map has exactly one entry per target whose handler
    /// completed. A handler that panics is logged and has no entry; it never
    /// affects other targets.
    pub async fn run<T, F, Fut>(&self, handler: F) -> HashMap<NodeId, T>
    where
        T: Send + 'static,
        F: Fn(NodeId) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let results: Arc<Mutex<HashMap<NodeId, T>>> =
            Arc::new(Mutex::new(HashMap::with_capacity(self.targets.len())));

        let handles: Vec<_> = self
            .targets
            .iter()
            .map(|&node| {
                let handler = Arc::clone(&handler);
                let results = Arc::clone(&results);
                tokio::spawn(async move {
                    let value = handler(node).await;
                    results.lock().insert(node, value);
                })
            })
            .collect();

        for (node, joined) in self.targets.iter().zip(join_all(handles).await) {
            if let Err(e) = joined {
                let err = FanOutError::from_join(*node, e);
                warn!(node = %err.node(), error = %err, "[gb-02] Handler did not complete");
            }
        }

        let results = std::mem::take(&mut *results.lock());
        debug!(
            targets = self.targets.len(),
            completed = results.len(),
            "[gb-02] Fan-out complete"
        );
        results
    }
}

/// Convenience wrapper: `FanOutExecutor::new(targets).run(handler)`.
pub async fn fan_out<T, F, Fut>(
    targets: impl IntoIterator<Item = NodeId>,
    handler: F,
) -> HashMap<NodeId, T>
where
    T: Send + 'static,
    F: Fn(NodeId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    FanOutExecutor::new(targets).run(handler).await
}
