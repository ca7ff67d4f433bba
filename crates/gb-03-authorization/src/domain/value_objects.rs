//! # Value Objects
//!
//! Commands and the node-level overrides attached to them.

use shared_types::{ChannelId, RoleId, UserId};
use std::fmt;

/// Logical command name (e.g. `gban`, `trusted`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandId(String);

impl CommandId {
    /// Create a command id.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Command name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

/// What an override applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverrideTarget {
    /// One specific channel.
    Channel(ChannelId),
    /// Wildcard covering every channel of the node.
    AllChannels,
    /// One specific role.
    Role(RoleId),
    /// The implicit role every member holds.
    Everyone,
    /// One specific user.
    User(UserId),
}

/// A node-specific rule enabling or disabling a command for a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PermissionOverride {
    /// Rule target.
    pub target: OverrideTarget,
    /// True to allow, false to deny.
    pub enabled: bool,
}

impl PermissionOverride {
    /// Allow rule.
    pub fn allow(target: OverrideTarget) -> Self {
        Self {
            target,
            enabled: true,
        }
    }

    /// Deny rule.
    pub fn deny(target: OverrideTarget) -> Self {
        Self {
            target,
            enabled: false,
        }
    }

    /// True for channel-scoped rules (specific or wildcard).
    pub fn is_channel_scoped(&self) -> bool {
        matches!(
            self.target,
            OverrideTarget::Channel(_) | OverrideTarget::AllChannels
        )
    }

    /// True for rules naming a specific user or role (not `Everyone`).
    pub fn is_member_scoped(&self) -> bool {
        matches!(
            self.target,
            OverrideTarget::User(_) | OverrideTarget::Role(_)
        )
    }
}
