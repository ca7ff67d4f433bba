//! `NotificationDirectory` adapter over the node settings registry.

use async_trait::async_trait;
use gb_04_propagation::NotificationDirectory;
use gb_05_node_registry::SettingsRegistry;
use shared_types::{ChannelId, NodeId};
use std::sync::Arc;

/// Answers notification lookups from [`SettingsRegistry`].
pub struct SettingsDirectory {
    settings: Arc<SettingsRegistry>,
}

impl SettingsDirectory {
    /// Wrap a loaded registry.
    pub fn new(settings: Arc<SettingsRegistry>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl NotificationDirectory for SettingsDirectory {
    async fn notification_channel(&self, node: NodeId) -> Option<ChannelId> {
        self.settings.notification_channel(node)
    }

    async fn trust_new_nodes(&self, node: NodeId) -> bool {
        self.settings.trust_new_nodes(node)
    }
}
