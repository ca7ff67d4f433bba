//! # Core Domain Entities
//!
//! Identifiers and actor descriptors shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `NodeId`, `UserId`, `ChannelId`, `RoleId`, `MessageId`
//! - **Actors**: `NodeRef`, `Actor`
//! - **Capabilities**: `Permission`, `PermissionSet`

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of one independently managed community (tenant).
    NodeId
);
define_id!(
    /// Identifier of a platform user.
    UserId
);
define_id!(
    /// Identifier of a channel inside a node.
    ChannelId
);
define_id!(
    /// Identifier of a role inside a node.
    RoleId
);
define_id!(
    /// Identifier of a posted message.
    MessageId
);

// =============================================================================
// CLUSTER B: ACTORS
// =============================================================================

/// A node together with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    /// Node identifier.
    pub id: NodeId,
    /// Display name at the time the reference was taken.
    pub name: String,
}

impl NodeRef {
    /// Create a node reference.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A user together with their display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier.
    pub id: UserId,
    /// Display name at the time the reference was taken.
    pub name: String,
}

impl Actor {
    /// Create an actor reference.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Platform mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

// =============================================================================
// CLUSTER C: CAPABILITIES
// =============================================================================

/// Platform capabilities relevant to moderation propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Baseline capability to invoke any command.
    UseApplicationCommands,
    /// Ban members of a node.
    BanMembers,
    /// Manage node-wide configuration.
    ManageServer,
    /// Implies every other permission.
    Administrator,
}

impl Permission {
    const fn bit(self) -> u8 {
        match self {
            Permission::UseApplicationCommands => 1,
            Permission::BanMembers => 1 << 1,
            Permission::ManageServer => 1 << 2,
            Permission::Administrator => 1 << 3,
        }
    }
}

/// Effective permissions of a member in some scope (node or channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionSet(u8);

impl PermissionSet {
    /// No permissions.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from a list of permissions.
    pub fn of(permissions: &[Permission]) -> Self {
        permissions
            .iter()
            .fold(Self::empty(), |set, p| set.with(*p))
    }

    /// Return a copy with `permission` added.
    pub const fn with(self, permission: Permission) -> Self {
        Self(self.0 | permission.bit())
    }

    /// True if `permission` is held directly or through `Administrator`.
    pub const fn contains(self, permission: Permission) -> bool {
        self.0 & Permission::Administrator.bit() != 0 || self.0 & permission.bit() != 0
    }

    /// True if no permission is held.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, p| set.with(p))
    }
}
