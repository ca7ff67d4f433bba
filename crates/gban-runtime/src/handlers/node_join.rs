//! # Node Membership Handlers
//!
//! Keeps the bot out of servers that are not whitelisted and introduces
//! newly joined servers to the rest of the network.

use std::sync::Arc;

use gb_01_trust_graph::TrustApi;
use gb_04_propagation::{ChatPlatform, ErrorSink, GlobalBanApi, OnboardingOutcome};
use shared_types::{NodeId, NodeRef};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::container::ServiceContainer;

/// Reacts to the bot joining servers and to the bot starting up.
pub struct NodeJoinHandler {
    container: Arc<ServiceContainer>,
}

impl NodeJoinHandler {
    /// Create the handler over a built container.
    pub fn new(container: Arc<ServiceContainer>) -> Self {
        Self { container }
    }

    /// The bot was added to `node`.
    ///
    /// Leaves the node if it is not whitelisted. Otherwise the new node
    /// trusts the main node and every other member node is told about it.
    /// Returns the onboarding outcomes, empty when the bot left.
    pub async fn on_node_joined(&self, node: NodeRef) -> HashMap<NodeId, OnboardingOutcome> {
        if !self.container.whitelist.is_whitelisted(node.id) {
            info!(node = %node, "[runtime] Leaving server because it's not whitelisted");
            if let Err(e) = self.container.platform.leave_node(node.id).await {
                self.container.errors.report(Some(node), &e).await;
            }
            return HashMap::new();
        }

        let main = self.container.whitelist.main_node();
        if node.id != main {
            if let Err(e) = self.container.trust.set_trust(node.id, main, true).await {
                self.container.errors.report(Some(node.clone()), &e).await;
                if e.is_fatal() {
                    self.container.errors.escalate_fatal(&e).await;
                }
            }
            self.container.record_trust_edges();
        }

        let members = match self.container.platform.member_nodes().await {
            Ok(members) => members,
            Err(e) => {
                self.container.errors.report(Some(node), &e).await;
                return HashMap::new();
            }
        };
        let targets = members.into_iter().map(|n| n.id).collect();

        let outcomes = self
            .container
            .propagation
            .announce_new_node(node.clone(), targets)
            .await;
        self.container.record_trust_edges();
        info!(
            node = %node,
            notified = outcomes.values().filter(|o| o.notice_posted).count(),
            auto_trusted = outcomes.values().filter(|o| o.auto_trusted).count(),
            "[runtime] New server announced"
        );
        outcomes
    }

    /// Leave every member node that is not whitelisted. Returns the nodes left.
    pub async fn reconcile_on_startup(&self) -> Vec<NodeId> {
        let members = match self.container.platform.member_nodes().await {
            Ok(members) => members,
            Err(e) => {
                warn!(error = %e, "[runtime] Cannot list servers at startup");
                self.container.errors.report(None, &e).await;
                return Vec::new();
            }
        };

        let mut left = Vec::new();
        for node in members {
            if self.container.whitelist.is_whitelisted(node.id) {
                continue;
            }
            info!(node = %node, "[runtime] Leaving server because it's not whitelisted");
            match self.container.platform.leave_node(node.id).await {
                Ok(()) => left.push(node.id),
                Err(e) => self.container.errors.report(Some(node), &e).await,
            }
        }
        left
    }
}
