//! # Override Precedence
//!
//! Pure evaluation of one [`AuthorizationSnapshot`]. No I/O; the resolver
//! service gathers the snapshot and calls [`evaluate`].

use crate::domain::{AuthorizationSnapshot, Decision, OverrideTarget};
use shared_types::Permission;

/// Evaluate the override precedence for one operator and command.
pub fn evaluate(snapshot: &AuthorizationSnapshot) -> Decision {
    if !snapshot
        .permissions
        .contains(Permission::UseApplicationCommands)
    {
        return Decision::MissingBaseline;
    }

    let overrides = &snapshot.overrides;

    // Exact channel beats the wildcard; only a deny short-circuits.
    if let Some(channel) = snapshot.channel {
        let exact = overrides
            .iter()
            .find(|o| o.target == OverrideTarget::Channel(channel));
        let wildcard = overrides
            .iter()
            .find(|o| o.target == OverrideTarget::AllChannels);
        if let Some(rule) = exact.or(wildcard) {
            if !rule.enabled {
                return Decision::ChannelDenied;
            }
        }
    }

    if let Some(rule) = overrides
        .iter()
        .find(|o| o.target == OverrideTarget::User(snapshot.operator))
    {
        return Decision::UserOverride(rule.enabled);
    }

    let held_roles = overrides.iter().filter(|o| match o.target {
        OverrideTarget::Role(role) => snapshot.roles.contains(&role),
        _ => false,
    });
    let (mut any_allowed, mut any_denied) = (false, false);
    for rule in held_roles {
        any_allowed |= rule.enabled;
        any_denied |= !rule.enabled;
    }
    if any_allowed {
        return Decision::RoleAllowed;
    }
    if any_denied {
        return Decision::RoleDenied;
    }
    if let Some(rule) = overrides
        .iter()
        .find(|o| o.target == OverrideTarget::Everyone)
    {
        return Decision::EveryoneOverride(rule.enabled);
    }

    // Member-scoped overrides restrict the command to the members they name.
    if overrides.iter().any(|o| o.is_member_scoped()) {
        return Decision::UnmatchedOverrides;
    }

    match snapshot.default_permission {
        Some(permission) => Decision::DefaultPermission(snapshot.permissions.contains(permission)),
        None => Decision::NoDefault,
    }
}
