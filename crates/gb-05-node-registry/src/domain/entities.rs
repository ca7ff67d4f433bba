//! # Registry Entities

use serde::{Deserialize, Serialize};
use shared_types::{ChannelId, NodeId};
use std::collections::{BTreeSet, HashSet};

/// Notification settings of one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Node the settings belong to.
    pub node: NodeId,
    /// Channel receiving global notices. No notices are posted without one.
    pub notification_channel: Option<ChannelId>,
    /// Trust nodes the bot joins later automatically.
    #[serde(default)]
    pub trust_new_nodes: bool,
}

impl NodeSettings {
    /// Settings of a node that never configured anything.
    pub fn unconfigured(node: NodeId) -> Self {
        Self {
            node,
            notification_channel: None,
            trust_new_nodes: false,
        }
    }
}

/// The member nodes a global operation is dispatched to: those that are
/// whitelisted, plus the main node if the bot is a member of it.
pub fn active_targets(
    member_nodes: impl IntoIterator<Item = NodeId>,
    whitelist: &HashSet<NodeId>,
    main_node: NodeId,
) -> BTreeSet<NodeId> {
    member_nodes
        .into_iter()
        .filter(|n| *n == main_node || whitelist.contains(n))
        .collect()
}
