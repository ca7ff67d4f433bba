//! # Registry Services
//!
//! [`Whitelist`] and [`SettingsRegistry`] hold an in-memory copy of their
//! store behind a `RwLock`. Writes persist first (with one reconnect retry)
//! and update memory only on success. The lock is never held across an await;
//! an async write guard serializes each read-modify-write instead, so a write
//! that is slow to persist cannot be overwritten by a stale copy.

use crate::domain::{active_targets, NodeSettings, RegistryError};
use crate::ports::{SettingsStore, WhitelistStore};
use parking_lot::RwLock;
use shared_types::{with_reconnect, ChannelId, NodeId};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Nodes allowed to keep the bot. The main node is always allowed and is
/// never stored.
pub struct Whitelist {
    store: Arc<dyn WhitelistStore>,
    main_node: NodeId,
    nodes: RwLock<HashSet<NodeId>>,
    write_guard: Mutex<()>,
}

impl Whitelist {
    /// Load the stored whitelist.
    pub async fn load(
        store: Arc<dyn WhitelistStore>,
        main_node: NodeId,
    ) -> Result<Self, RegistryError> {
        let nodes: HashSet<NodeId> =
            with_reconnect(store.as_ref(), "read_nodes", || store.read_nodes())
                .await?
                .into_iter()
                .filter(|n| *n != main_node)
                .collect();
        info!(nodes = nodes.len(), main_node = %main_node, "[gb-05] Whitelist loaded");
        Ok(Self {
            store,
            main_node,
            nodes: RwLock::new(nodes),
            write_guard: Mutex::new(()),
        })
    }

    /// The main node.
    pub fn main_node(&self) -> NodeId {
        self.main_node
    }

    /// True for the main node and every stored node.
    pub fn is_whitelisted(&self, node: NodeId) -> bool {
        node == self.main_node || self.nodes.read().contains(&node)
    }

    /// Every whitelisted node, main node included, sorted.
    pub fn all_nodes(&self) -> BTreeSet<NodeId> {
        let mut all: BTreeSet<NodeId> = self.nodes.read().iter().copied().collect();
        all.insert(self.main_node);
        all
    }

    /// Whitelist `node`. Returns false if it already was.
    pub async fn add(&self, node: NodeId) -> Result<bool, RegistryError> {
        let _guard = self.write_guard.lock().await;
        if self.is_whitelisted(node) {
            return Ok(false);
        }
        with_reconnect(self.store.as_ref(), "insert_node", || {
            self.store.insert_node(node)
        })
        .await?;
        let added = self.nodes.write().insert(node);
        debug!(node = %node, "[gb-05] Server whitelisted");
        Ok(added)
    }

    /// Remove `node` from the whitelist. Returns false if it was not listed.
    pub async fn remove(&self, node: NodeId) -> Result<bool, RegistryError> {
        if node == self.main_node {
            return Err(RegistryError::MainNode(node));
        }
        let _guard = self.write_guard.lock().await;
        if !self.nodes.read().contains(&node) {
            return Ok(false);
        }
        with_reconnect(self.store.as_ref(), "delete_node", || {
            self.store.delete_node(node)
        })
        .await?;
        let removed = self.nodes.write().remove(&node);
        debug!(node = %node, "[gb-05] Server removed from whitelist");
        Ok(removed)
    }

    /// Whitelisted subset of `member_nodes`.
    pub fn active_targets(&self, member_nodes: impl IntoIterator<Item = NodeId>) -> BTreeSet<NodeId> {
        active_targets(member_nodes, &self.nodes.read(), self.main_node)
    }
}

/// Per-node notification settings.
pub struct SettingsRegistry {
    store: Arc<dyn SettingsStore>,
    settings: RwLock<HashMap<NodeId, NodeSettings>>,
    write_guard: Mutex<()>,
}

impl SettingsRegistry {
    /// Load every stored settings row.
    pub async fn load(store: Arc<dyn SettingsStore>) -> Result<Self, RegistryError> {
        let rows = with_reconnect(store.as_ref(), "read_all", || store.read_all()).await?;
        let settings: HashMap<NodeId, NodeSettings> =
            rows.into_iter().map(|s| (s.node, s)).collect();
        info!(nodes = settings.len(), "[gb-05] Node settings loaded");
        Ok(Self {
            store,
            settings: RwLock::new(settings),
            write_guard: Mutex::new(()),
        })
    }

    /// Settings of `node`; unconfigured defaults when none are stored.
    pub fn get(&self, node: NodeId) -> NodeSettings {
        self.settings
            .read()
            .get(&node)
            .copied()
            .unwrap_or_else(|| NodeSettings::unconfigured(node))
    }

    /// Notification channel of `node`.
    pub fn notification_channel(&self, node: NodeId) -> Option<ChannelId> {
        self.get(node).notification_channel
    }

    /// Whether `node` trusts new nodes automatically.
    pub fn trust_new_nodes(&self, node: NodeId) -> bool {
        self.get(node).trust_new_nodes
    }

    /// Set or clear the notification channel of `node`.
    pub async fn set_notification_channel(
        &self,
        node: NodeId,
        channel: Option<ChannelId>,
    ) -> Result<(), RegistryError> {
        self.update(node, |s| s.notification_channel = channel).await
    }

    /// Enable or disable trusting new nodes on `node`.
    pub async fn set_trust_new_nodes(&self, node: NodeId, enabled: bool) -> Result<(), RegistryError> {
        self.update(node, |s| s.trust_new_nodes = enabled).await
    }

    async fn update(
        &self,
        node: NodeId,
        change: impl FnOnce(&mut NodeSettings),
    ) -> Result<(), RegistryError> {
        let _guard = self.write_guard.lock().await;
        let mut settings = self.get(node);
        change(&mut settings);
        with_reconnect(self.store.as_ref(), "upsert_settings", || {
            self.store.upsert(settings)
        })
        .await?;
        self.settings.write().insert(settings.node, settings);
        debug!(
            node = %settings.node,
            channel = ?settings.notification_channel,
            trust_new_nodes = settings.trust_new_nodes,
            "[gb-05] Server settings updated"
        );
        Ok(())
    }
}
