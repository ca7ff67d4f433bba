//! # Test Doubles
//!
//! Recording implementations of the outbound ports. Used by unit tests,
//! the cross-subsystem scenarios and the dry-run runtime.

use crate::domain::Control;
use crate::ports::{ChatPlatform, ErrorSink, NotificationDirectory, OutgoingMessage};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{ChannelId, MessageId, NodeId, NodeRef, PlatformError, UserId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

// =============================================================================
// Chat platform
// =============================================================================

/// A message recorded by [`RecordingChatPlatform`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    /// Node it was posted in.
    pub node: NodeId,
    /// Channel it was posted in.
    pub channel: ChannelId,
    /// Id assigned on posting.
    pub id: MessageId,
    /// Posted content.
    pub message: OutgoingMessage,
}

/// A ban recorded by [`RecordingChatPlatform`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedBan {
    /// Node the user was banned from.
    pub node: NodeId,
    /// Banned user.
    pub user: UserId,
    /// Audit reason.
    pub reason: String,
}

/// In-memory chat platform that records every call.
///
/// Nodes must be registered with [`RecordingChatPlatform::add_node`] to be
/// visible. Individual nodes can be made to fail bans, fail sends, or hang.
#[derive(Default)]
pub struct RecordingChatPlatform {
    nodes: RwLock<BTreeMap<NodeId, NodeRef>>,
    failing_bans: RwLock<HashSet<NodeId>>,
    failing_sends: RwLock<HashSet<NodeId>>,
    hanging: RwLock<HashSet<NodeId>>,
    bans: Mutex<Vec<RecordedBan>>,
    sent: Mutex<Vec<SentMessage>>,
    replaced: Mutex<Vec<(NodeId, MessageId, Control)>>,
    left: Mutex<Vec<NodeId>>,
    next_message: AtomicU64,
}

impl RecordingChatPlatform {
    /// Platform with no nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the bot a member of `node`.
    pub fn add_node(&self, node: NodeRef) {
        self.nodes.write().insert(node.id, node);
    }

    /// Make bans on `node` fail with `Forbidden`.
    pub fn fail_bans_on(&self, node: NodeId) {
        self.failing_bans.write().insert(node);
    }

    /// Undo [`RecordingChatPlatform::fail_bans_on`].
    pub fn allow_bans_on(&self, node: NodeId) {
        self.failing_bans.write().remove(&node);
    }

    /// Make message posts on `node` fail with `Forbidden`.
    pub fn fail_sends_on(&self, node: NodeId) {
        self.failing_sends.write().insert(node);
    }

    /// Make every call on `node` hang for an hour.
    pub fn hang_on(&self, node: NodeId) {
        self.hanging.write().insert(node);
    }

    /// Recorded bans.
    pub fn bans(&self) -> Vec<RecordedBan> {
        self.bans.lock().clone()
    }

    /// Nodes where `user` was banned.
    pub fn banned_on(&self, user: UserId) -> HashSet<NodeId> {
        self.bans
            .lock()
            .iter()
            .filter(|b| b.user == user)
            .map(|b| b.node)
            .collect()
    }

    /// Every posted message.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Messages posted in `node`.
    pub fn messages_in(&self, node: NodeId) -> Vec<SentMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.node == node)
            .cloned()
            .collect()
    }

    /// Replaced controls, in call order.
    pub fn replaced_controls(&self) -> Vec<(NodeId, MessageId, Control)> {
        self.replaced.lock().clone()
    }

    /// Nodes the bot left.
    pub fn left_nodes(&self) -> Vec<NodeId> {
        self.left.lock().clone()
    }

    async fn maybe_hang(&self, node: NodeId) {
        let hang = self.hanging.read().contains(&node);
        if hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    }

    fn require_member(&self, node: NodeId) -> Result<(), PlatformError> {
        if self.nodes.read().contains_key(&node) {
            Ok(())
        } else {
            Err(PlatformError::NotFound(format!("server {}", node)))
        }
    }
}

#[async_trait]
impl ChatPlatform for RecordingChatPlatform {
    async fn node(&self, node: NodeId) -> Result<Option<NodeRef>, PlatformError> {
        Ok(self.nodes.read().get(&node).cloned())
    }

    async fn member_nodes(&self) -> Result<Vec<NodeRef>, PlatformError> {
        Ok(self.nodes.read().values().cloned().collect())
    }

    async fn send_message(
        &self,
        node: NodeId,
        channel: ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageId, PlatformError> {
        self.maybe_hang(node).await;
        self.require_member(node)?;
        if self.failing_sends.read().contains(&node) {
            return Err(PlatformError::Forbidden(format!(
                "cannot post in channel {}",
                channel
            )));
        }
        let id = MessageId(self.next_message.fetch_add(1, Ordering::SeqCst) + 1);
        self.sent.lock().push(SentMessage {
            node,
            channel,
            id,
            message,
        });
        Ok(id)
    }

    async fn ban_member(
        &self,
        node: NodeId,
        user: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.maybe_hang(node).await;
        self.require_member(node)?;
        if self.failing_bans.read().contains(&node) {
            return Err(PlatformError::Forbidden("missing ban members".into()));
        }
        self.bans.lock().push(RecordedBan {
            node,
            user,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn replace_control(
        &self,
        node: NodeId,
        _channel: ChannelId,
        message: MessageId,
        control: Control,
    ) -> Result<(), PlatformError> {
        self.require_member(node)?;
        self.replaced.lock().push((node, message, control));
        Ok(())
    }

    async fn leave_node(&self, node: NodeId) -> Result<(), PlatformError> {
        self.require_member(node)?;
        self.nodes.write().remove(&node);
        self.left.lock().push(node);
        Ok(())
    }
}

// =============================================================================
// Notification directory
// =============================================================================

/// Fixed notification settings.
#[derive(Default)]
pub struct StaticNotificationDirectory {
    channels: RwLock<HashMap<NodeId, ChannelId>>,
    trust_new: RwLock<HashSet<NodeId>>,
}

impl StaticNotificationDirectory {
    /// No channels, nobody trusts new nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the notification channel of `node`.
    pub fn set_channel(&self, node: NodeId, channel: ChannelId) {
        self.channels.write().insert(node, channel);
    }

    /// Enable or disable trusting new nodes on `node`.
    pub fn set_trust_new_nodes(&self, node: NodeId, enabled: bool) {
        let mut trust_new = self.trust_new.write();
        if enabled {
            trust_new.insert(node);
        } else {
            trust_new.remove(&node);
        }
    }
}

#[async_trait]
impl NotificationDirectory for StaticNotificationDirectory {
    async fn notification_channel(&self, node: NodeId) -> Option<ChannelId> {
        self.channels.read().get(&node).copied()
    }

    async fn trust_new_nodes(&self, node: NodeId) -> bool {
        self.trust_new.read().contains(&node)
    }
}

// =============================================================================
// Error sink
// =============================================================================

/// Error sink that keeps every report in memory.
#[derive(Default)]
pub struct CollectingErrorSink {
    reports: Mutex<Vec<(Option<NodeId>, String)>>,
    fatal: Mutex<Vec<String>>,
}

impl CollectingErrorSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports as `(node, rendered error)`.
    pub fn reports(&self) -> Vec<(Option<NodeId>, String)> {
        self.reports.lock().clone()
    }

    /// Escalated fatal errors.
    pub fn fatal(&self) -> Vec<String> {
        self.fatal.lock().clone()
    }
}

#[async_trait]
impl ErrorSink for CollectingErrorSink {
    async fn report(
        &self,
        node: Option<NodeRef>,
        error: &(dyn std::error::Error + Send + Sync + 'static),
    ) {
        self.reports
            .lock()
            .push((node.map(|n| n.id), error.to_string()));
    }

    async fn escalate_fatal(&self, error: &(dyn std::error::Error + Send + Sync + 'static)) {
        self.fatal.lock().push(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_platform_records_and_fails_on_demand() {
        let platform = RecordingChatPlatform::new();
        platform.add_node(NodeRef::new(NodeId(1), "One"));
        platform.fail_bans_on(NodeId(1));

        assert!(platform.ban_member(NodeId(1), UserId(7), "x").await.is_err());
        let id = platform
            .send_message(NodeId(1), ChannelId(3), OutgoingMessage::plain("hi"))
            .await
            .unwrap();
        assert_eq!(id, MessageId(1));
        assert_eq!(platform.messages_in(NodeId(1)).len(), 1);
        assert!(platform
            .send_message(NodeId(2), ChannelId(3), OutgoingMessage::plain("hi"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_leave_removes_node() {
        let platform = RecordingChatPlatform::new();
        platform.add_node(NodeRef::new(NodeId(1), "One"));
        platform.leave_node(NodeId(1)).await.unwrap();
        assert!(platform.node(NodeId(1)).await.unwrap().is_none());
        assert_eq!(platform.left_nodes(), vec![NodeId(1)]);
    }
}
