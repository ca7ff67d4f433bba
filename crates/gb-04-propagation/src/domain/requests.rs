//! # Requests
//!
//! Immutable inputs of a global ban and a global alert.

use shared_types::{Actor, NodeId, NodeRef};
use std::collections::BTreeSet;

/// What to ban, who asked for it and why. Carried by fallback controls so a
/// later click can re-apply the same ban.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BanOrder {
    /// Operator who issued the global ban.
    pub issuer: Actor,
    /// Node the ban was issued from.
    pub origin: NodeRef,
    /// User to ban.
    pub target_user: Actor,
    /// Free-text reason given by the issuer.
    pub reason: String,
}

impl BanOrder {
    /// Reason recorded in the target node's audit log.
    pub fn audit_reason(&self) -> String {
        format!(
            "Global ban by {} from {}: {}",
            self.issuer.name, self.origin.name, self.reason
        )
    }
}

/// One global ban, dispatched once to every target node.
#[derive(Clone, Debug)]
pub struct PropagationRequest {
    /// The ban itself.
    pub order: BanOrder,
    /// Nodes to propagate to. May include the origin node.
    pub targets: BTreeSet<NodeId>,
}

impl PropagationRequest {
    /// Create a request.
    pub fn new(order: BanOrder, targets: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            order,
            targets: targets.into_iter().collect(),
        }
    }
}

/// A global alert about a user, posted everywhere without any action.
#[derive(Clone, Debug)]
pub struct AlertRequest {
    /// Operator who issued the alert.
    pub issuer: Actor,
    /// Node the alert was issued from.
    pub origin: NodeRef,
    /// User the alert is about.
    pub target_user: Actor,
    /// Alert text.
    pub message: String,
    /// Nodes to alert.
    pub targets: BTreeSet<NodeId>,
}
