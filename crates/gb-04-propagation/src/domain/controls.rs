//! # Fallback Controls
//!
//! Interactive controls attached to notices when an automatic step did not
//! happen. A control carries its full action payload, so invoking it needs
//! no server-side state and it never expires.

use super::requests::BanOrder;
use shared_types::{Actor, ChannelId, MessageId, NodeId, NodeRef};
use std::fmt;

/// Action performed when a fallback control is invoked.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FallbackAction {
    /// Apply the ban on the node where the control was posted.
    ApplyBan(BanOrder),
    /// Apply the ban and make the node trust the ban's origin.
    ApplyBanAndTrust(BanOrder),
    /// Make the node where the control was posted trust `node`.
    TrustNode {
        /// Node to trust.
        node: NodeRef,
    },
}

impl FallbackAction {
    /// Label of the live control.
    pub fn label(&self) -> &'static str {
        match self {
            FallbackAction::ApplyBan(_) => "Apply ban",
            FallbackAction::ApplyBanAndTrust(_) => "Apply ban and trust server",
            FallbackAction::TrustNode { .. } => "Trust server",
        }
    }

    /// Label of the disabled control shown once the action is done.
    pub fn completed_label(&self) -> &'static str {
        match self {
            FallbackAction::ApplyBan(_) => "Ban applied",
            FallbackAction::ApplyBanAndTrust(_) => "Applied and trusted",
            FallbackAction::TrustNode { .. } => "Server trusted",
        }
    }

    /// Stable label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FallbackAction::ApplyBan(_) => "apply_ban",
            FallbackAction::ApplyBanAndTrust(_) => "apply_ban_and_trust",
            FallbackAction::TrustNode { .. } => "trust_node",
        }
    }

    /// Deterministic control id derived from the payload.
    pub fn control_id(&self) -> ControlId {
        match self {
            FallbackAction::ApplyBan(order) => ControlId(format!(
                "apply-ban:{}:{}",
                order.origin.id, order.target_user.id
            )),
            FallbackAction::ApplyBanAndTrust(order) => ControlId(format!(
                "apply-ban-trust:{}:{}",
                order.origin.id, order.target_user.id
            )),
            FallbackAction::TrustNode { node } => ControlId(format!("trust-node:{}", node.id)),
        }
    }
}

/// Identifier of a control within a message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ControlId(pub String);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A button-like control rendered under a notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    /// Identifier, unique within its message.
    pub id: ControlId,
    /// Rendered label.
    pub label: String,
    /// Disabled controls cannot be invoked.
    pub disabled: bool,
    /// Payload; `None` for completed controls.
    pub action: Option<FallbackAction>,
}

impl Control {
    /// Live control for `action`.
    pub fn fallback(action: FallbackAction) -> Self {
        Self {
            id: action.control_id(),
            label: action.label().to_string(),
            disabled: false,
            action: Some(action),
        }
    }

    /// Disabled replacement shown after `action` completed.
    pub fn completed(action: &FallbackAction) -> Self {
        Self {
            id: action.control_id(),
            label: format!("{} \u{2705}", action.completed_label()),
            disabled: true,
            action: None,
        }
    }
}

/// A click on a fallback control.
#[derive(Clone, Debug)]
pub struct ControlInvocation {
    /// Node the control was posted in.
    pub node: NodeId,
    /// Channel the control was posted in.
    pub channel: ChannelId,
    /// Message carrying the control.
    pub message: MessageId,
    /// Operator who clicked. Not necessarily the original issuer.
    pub operator: Actor,
    /// Payload of the clicked control.
    pub action: FallbackAction,
}

/// Why an invocation was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenialReason {
    /// Operator may not ban on this node.
    MissingBanPermission,
    /// Operator may not change this node's trust list.
    MissingTrustPermission,
}

impl DenialReason {
    /// Reply shown to the operator.
    pub fn message(self, operator: &Actor) -> String {
        match self {
            DenialReason::MissingBanPermission => format!(
                "{} You don't have permission to ban members in this server.",
                operator.mention()
            ),
            DenialReason::MissingTrustPermission => format!(
                "{} You don't have permission to modify the trusted server list.",
                operator.mention()
            ),
        }
    }
}

/// Result of a fallback invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// Action performed and control disabled.
    Completed,
    /// Authorization refused; nothing performed.
    Denied(DenialReason),
    /// A remote call failed. `fatal` is set for trust-graph consistency failures.
    Failed {
        /// Internal-consistency failure that must stop the process.
        fatal: bool,
    },
}

impl FallbackOutcome {
    /// Stable label used for metrics and logs.
    pub fn label(self) -> &'static str {
        match self {
            FallbackOutcome::Completed => "completed",
            FallbackOutcome::Denied(_) => "denied",
            FallbackOutcome::Failed { .. } => "failed",
        }
    }

    /// True when the process must shut down.
    pub fn is_fatal(self) -> bool {
        matches!(self, FallbackOutcome::Failed { fatal: true })
    }
}
