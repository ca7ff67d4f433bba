//! # Domain Entities
//!
//! The inputs of one authorization check and its outcome.

use super::value_objects::PermissionOverride;
use shared_types::{ChannelId, Permission, PermissionSet, RoleId, UserId};
use std::collections::HashSet;

/// Everything needed to decide one check, fetched fresh per check.
#[derive(Clone, Debug, Default)]
pub struct AuthorizationSnapshot {
    /// Operator being checked.
    pub operator: UserId,
    /// Operator's effective permissions in the channel (or node-wide).
    pub permissions: PermissionSet,
    /// Roles the operator holds in the node.
    pub roles: HashSet<RoleId>,
    /// Node overrides for the command.
    pub overrides: Vec<PermissionOverride>,
    /// Channel scope of the check, if any.
    pub channel: Option<ChannelId>,
    /// Permission required when no override applies.
    pub default_permission: Option<Permission>,
}

/// Which rule decided a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Baseline capability missing in scope.
    MissingBaseline,
    /// Channel override (exact or wildcard) denies.
    ChannelDenied,
    /// User override for the operator.
    UserOverride(bool),
    /// Some held role is explicitly allowed.
    RoleAllowed,
    /// Some held role is explicitly denied and none allowed.
    RoleDenied,
    /// The everyone override.
    EveryoneOverride(bool),
    /// Member overrides exist but none targets this operator.
    UnmatchedOverrides,
    /// Whether the default permission is held.
    DefaultPermission(bool),
    /// No override and no default permission configured.
    NoDefault,
}

impl Decision {
    /// Final boolean verdict.
    pub fn allowed(self) -> bool {
        match self {
            Decision::MissingBaseline
            | Decision::ChannelDenied
            | Decision::RoleDenied
            | Decision::UnmatchedOverrides => false,
            Decision::RoleAllowed | Decision::NoDefault => true,
            Decision::UserOverride(v)
            | Decision::EveryoneOverride(v)
            | Decision::DefaultPermission(v) => v,
        }
    }
}
