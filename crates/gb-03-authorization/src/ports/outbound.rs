//! # Outbound Ports
//!
//! Traits for the chat-platform data the resolver reads.

use crate::domain::{CommandId, PermissionOverride};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{ChannelId, NodeId, PermissionSet, PlatformError, RoleId, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Platform permission data - outbound port. Every call is remote.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Effective permissions of `user` in `channel` (or node-wide when `None`).
    /// `Ok(None)` if the user is not a member of the node.
    async fn member_permissions(
        &self,
        node: NodeId,
        user: UserId,
        channel: Option<ChannelId>,
    ) -> Result<Option<PermissionSet>, PlatformError>;

    /// Overrides configured on `node` for `command`.
    async fn fetch_permission_overrides(
        &self,
        node: NodeId,
        command: &CommandId,
    ) -> Result<Vec<PermissionOverride>, PlatformError>;

    /// Roles `user` holds on `node`.
    async fn fetch_member_roles(
        &self,
        node: NodeId,
        user: UserId,
    ) -> Result<HashSet<RoleId>, PlatformError>;
}

// =============================================================================
// Static Implementation for Testing and Dry Runs
// =============================================================================

/// Table-driven permission source. All data can be changed between checks.
#[derive(Default)]
pub struct StaticPermissionSource {
    permissions: RwLock<HashMap<(NodeId, UserId), PermissionSet>>,
    channel_permissions: RwLock<HashMap<(NodeId, UserId, ChannelId), PermissionSet>>,
    overrides: RwLock<HashMap<(NodeId, String), Vec<PermissionOverride>>>,
    roles: RwLock<HashMap<(NodeId, UserId), HashSet<RoleId>>>,
    override_fetches: AtomicUsize,
    fail: RwLock<Option<PlatformError>>,
}

impl StaticPermissionSource {
    /// Empty source: nobody is a member anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set node-wide permissions of a member.
    pub fn set_permissions(&self, node: NodeId, user: UserId, permissions: PermissionSet) {
        self.permissions.write().insert((node, user), permissions);
    }

    /// Set channel-specific permissions of a member.
    pub fn set_channel_permissions(
        &self,
        node: NodeId,
        user: UserId,
        channel: ChannelId,
        permissions: PermissionSet,
    ) {
        self.channel_permissions
            .write()
            .insert((node, user, channel), permissions);
    }

    /// Replace the overrides of `command` on `node`.
    pub fn set_overrides(
        &self,
        node: NodeId,
        command: &CommandId,
        overrides: Vec<PermissionOverride>,
    ) {
        self.overrides
            .write()
            .insert((node, command.as_str().to_string()), overrides);
    }

    /// Replace the roles of a member.
    pub fn set_roles(&self, node: NodeId, user: UserId, roles: impl IntoIterator<Item = RoleId>) {
        self.roles
            .write()
            .insert((node, user), roles.into_iter().collect());
    }

    /// Make every call fail with `err` (or succeed again with `None`).
    pub fn fail_with(&self, err: Option<PlatformError>) {
        *self.fail.write() = err;
    }

    /// Number of override fetches served so far.
    pub fn override_fetch_count(&self) -> usize {
        self.override_fetches.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), PlatformError> {
        match self.fail.read().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PermissionSource for StaticPermissionSource {
    async fn member_permissions(
        &self,
        node: NodeId,
        user: UserId,
        channel: Option<ChannelId>,
    ) -> Result<Option<PermissionSet>, PlatformError> {
        self.check_failure()?;
        let scoped = channel.and_then(|c| {
            self.channel_permissions
                .read()
                .get(&(node, user, c))
                .copied()
        });
        Ok(scoped.or_else(|| self.permissions.read().get(&(node, user)).copied()))
    }

    async fn fetch_permission_overrides(
        &self,
        node: NodeId,
        command: &CommandId,
    ) -> Result<Vec<PermissionOverride>, PlatformError> {
        self.check_failure()?;
        self.override_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .overrides
            .read()
            .get(&(node, command.as_str().to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_member_roles(
        &self,
        node: NodeId,
        user: UserId,
    ) -> Result<HashSet<RoleId>, PlatformError> {
        self.check_failure()?;
        Ok(self
            .roles
            .read()
            .get(&(node, user))
            .cloned()
            .unwrap_or_default())
    }
}
