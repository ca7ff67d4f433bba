//! # Inbound Ports
//!
//! API trait exposed to the command-handling layer.

use crate::domain::{
    AlertRequest, AlertSummary, ControlInvocation, FallbackOutcome, PropagationRequest,
    PropagationSummary,
};
use async_trait::async_trait;
use shared_types::{NodeId, NodeRef};
use std::collections::{BTreeSet, HashMap};

/// Result of announcing a new node to one existing node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OnboardingOutcome {
    /// The target trusted the new node automatically.
    pub auto_trusted: bool,
    /// The informational notice was posted.
    pub notice_posted: bool,
}

/// Global moderation API - inbound port.
#[async_trait]
pub trait GlobalBanApi: Send + Sync {
    /// Propagate one global ban to every target and summarize the outcomes.
    ///
    /// Per-target failures are contained and counted; this never fails.
    async fn initiate_propagation(&self, request: PropagationRequest) -> PropagationSummary;

    /// Handle a click on a fallback control, re-authorizing the clicking operator.
    async fn on_fallback_control_invoked(&self, invocation: ControlInvocation) -> FallbackOutcome;

    /// Post a global alert to every target.
    async fn broadcast_alert(&self, request: AlertRequest) -> AlertSummary;

    /// Tell every target about a newly joined node, trusting it where configured.
    async fn announce_new_node(
        &self,
        new_node: NodeRef,
        targets: BTreeSet<NodeId>,
    ) -> HashMap<NodeId, OnboardingOutcome>;
}
