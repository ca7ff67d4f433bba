//! # Inbound Ports
//!
//! API trait defining what the Authorization subsystem can do.

use crate::domain::{AuthorizationError, CommandId, Decision};
use async_trait::async_trait;
use shared_types::{ChannelId, NodeId, Permission, UserId};

/// Authorization API - inbound port.
#[async_trait]
pub trait AuthorizationApi: Send + Sync {
    /// Decide whether `operator` may invoke `command` on `node`, reporting
    /// which rule decided.
    async fn decide(
        &self,
        operator: UserId,
        node: NodeId,
        command: &CommandId,
        default_permission: Option<Permission>,
        channel: Option<ChannelId>,
    ) -> Result<Decision, AuthorizationError>;

    /// Boolean form of [`AuthorizationApi::decide`].
    async fn can_invoke(
        &self,
        operator: UserId,
        node: NodeId,
        command: &CommandId,
        default_permission: Option<Permission>,
        channel: Option<ChannelId>,
    ) -> Result<bool, AuthorizationError> {
        self.decide(operator, node, command, default_permission, channel)
            .await
            .map(Decision::allowed)
    }
}
