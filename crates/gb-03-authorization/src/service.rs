//! # Authorization Resolver Service
//!
//! Gathers a fresh [`AuthorizationSnapshot`] from the platform and evaluates
//! it. Overrides and roles are only fetched once the baseline check passes.

use crate::algorithms::evaluate;
use crate::domain::{AuthorizationError, AuthorizationSnapshot, CommandId, Decision};
use crate::ports::{AuthorizationApi, PermissionSource};
use async_trait::async_trait;
use shared_types::{ChannelId, NodeId, Permission, UserId};
use std::sync::Arc;
use tracing::debug;

/// Resolves command permissions against live platform data.
pub struct AuthorizationResolver {
    source: Arc<dyn PermissionSource>,
}

impl AuthorizationResolver {
    /// Create a resolver reading from `source`.
    pub fn new(source: Arc<dyn PermissionSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl AuthorizationApi for AuthorizationResolver {
    async fn decide(
        &self,
        operator: UserId,
        node: NodeId,
        command: &CommandId,
        default_permission: Option<Permission>,
        channel: Option<ChannelId>,
    ) -> Result<Decision, AuthorizationError> {
        let Some(permissions) = self
            .source
            .member_permissions(node, operator, channel)
            .await?
        else {
            debug!(%operator, %node, "[gb-03] Operator is not a member of the node");
            return Ok(Decision::MissingBaseline);
        };

        if !permissions.contains(Permission::UseApplicationCommands) {
            debug!(%operator, %node, %command, "[gb-03] Baseline capability missing");
            return Ok(Decision::MissingBaseline);
        }

        let overrides = self
            .source
            .fetch_permission_overrides(node, command)
            .await?;
        let roles = self.source.fetch_member_roles(node, operator).await?;

        let decision = evaluate(&AuthorizationSnapshot {
            operator,
            permissions,
            roles,
            overrides,
            channel,
            default_permission,
        });

        debug!(
            %operator,
            %node,
            %command,
            ?decision,
            "[gb-03] Authorization decided"
        );
        Ok(decision)
    }
}
