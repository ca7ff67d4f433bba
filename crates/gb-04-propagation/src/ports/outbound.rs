//! # Outbound Ports
//!
//! Traits for external dependencies (chat platform, node settings,
//! operational error channel).

use crate::domain::Control;
use async_trait::async_trait;
use shared_types::{ChannelId, MessageId, NodeId, NodeRef, PlatformError, UserId};

/// A message to post, optionally with interactive controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Message body.
    pub text: String,
    /// Controls rendered under the message.
    pub controls: Vec<Control>,
    /// Whether mentions in `text` notify the mentioned users.
    pub allow_mentions: bool,
}

impl OutgoingMessage {
    /// Plain message with mentions suppressed.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            controls: Vec::new(),
            allow_mentions: false,
        }
    }

    /// Message with controls and mentions suppressed.
    pub fn with_controls(text: impl Into<String>, controls: Vec<Control>) -> Self {
        Self {
            text: text.into(),
            controls,
            allow_mentions: false,
        }
    }
}

/// Chat platform - outbound port. Every call is remote and fallible.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Look up a node the bot is a member of.
    async fn node(&self, node: NodeId) -> Result<Option<NodeRef>, PlatformError>;

    /// Every node the bot is currently a member of.
    async fn member_nodes(&self) -> Result<Vec<NodeRef>, PlatformError>;

    /// Post a message.
    async fn send_message(
        &self,
        node: NodeId,
        channel: ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageId, PlatformError>;

    /// Ban `user` from `node`, recording `reason` in the audit log.
    async fn ban_member(&self, node: NodeId, user: UserId, reason: &str)
        -> Result<(), PlatformError>;

    /// Replace the control with the same id on a posted message.
    async fn replace_control(
        &self,
        node: NodeId,
        channel: ChannelId,
        message: MessageId,
        control: Control,
    ) -> Result<(), PlatformError>;

    /// Make the bot leave `node`.
    async fn leave_node(&self, node: NodeId) -> Result<(), PlatformError>;
}

/// Per-node notification settings - outbound port.
#[async_trait]
pub trait NotificationDirectory: Send + Sync {
    /// Channel receiving global notices on `node`, if configured.
    async fn notification_channel(&self, node: NodeId) -> Option<ChannelId>;

    /// Whether `node` automatically trusts nodes the bot joins later.
    async fn trust_new_nodes(&self, node: NodeId) -> bool;
}

/// Operational error channel - outbound port.
///
/// Reporting never fails from the caller's point of view.
#[async_trait]
pub trait ErrorSink: Send + Sync {
    /// Report `error`, attributed to `node` when known.
    async fn report(
        &self,
        node: Option<NodeRef>,
        error: &(dyn std::error::Error + Send + Sync + 'static),
    );

    /// Report an internal-consistency failure that must stop the process.
    async fn escalate_fatal(&self, error: &(dyn std::error::Error + Send + Sync + 'static));
}
