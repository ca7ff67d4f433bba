//! # Propagation Service
//!
//! Implements [`GlobalBanApi`] on top of the trust graph, the fan-out
//! executor and the authorization resolver.
//!
//! ## Per-target steps of a global ban
//!
//! 1. Resolve the node. Unknown nodes end as `ErrorFailure`.
//! 2. If the node trusts the origin, apply the ban.
//! 3. Post a notice in the node's notification channel: a plain
//!    confirmation, a retry control after a failed ban, or "apply" and
//!    "apply and trust" controls when the origin is not trusted.
//! 4. Classify with [`PropagationOutcome::from_steps`].
//!
//! Every step failure is reported to the [`ErrorSink`] and reduced to an
//! outcome. The whole handler runs under the configured time budget.

use crate::domain::{
    notices, AlertRequest, AlertSummary, BanOrder, Control, ControlInvocation, DenialReason,
    FallbackAction, FallbackOutcome, PropagationConfig, PropagationError, PropagationOutcome,
    PropagationRequest, PropagationSummary, GBAN_COMMAND, GBAN_COMMAND_PERMISSION,
    TRUSTED_COMMAND, TRUSTED_COMMAND_PERMISSION,
};
use crate::ports::{
    ChatPlatform, ErrorSink, GlobalBanApi, NotificationDirectory, OnboardingOutcome,
    OutgoingMessage,
};
use async_trait::async_trait;
use gb_01_trust_graph::TrustApi;
use gb_02_fan_out::FanOutExecutor;
use gb_03_authorization::{AuthorizationApi, CommandId};
use shared_types::{NodeId, NodeRef, Permission};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Global ban propagation service.
///
/// Cheap to clone; every dependency is shared. Each per-node handler owns
/// a clone.
#[derive(Clone)]
pub struct PropagationService {
    trust: Arc<dyn TrustApi>,
    authorization: Arc<dyn AuthorizationApi>,
    platform: Arc<dyn ChatPlatform>,
    directory: Arc<dyn NotificationDirectory>,
    errors: Arc<dyn ErrorSink>,
    config: PropagationConfig,
}

impl PropagationService {
    /// Create a new service.
    pub fn new(
        trust: Arc<dyn TrustApi>,
        authorization: Arc<dyn AuthorizationApi>,
        platform: Arc<dyn ChatPlatform>,
        directory: Arc<dyn NotificationDirectory>,
        errors: Arc<dyn ErrorSink>,
        config: PropagationConfig,
    ) -> Self {
        Self {
            trust,
            authorization,
            platform,
            directory,
            errors,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    async fn report(&self, node: Option<&NodeRef>, error: PropagationError) {
        warn!(error = %error, "[gb-04] Step failed");
        self.errors.report(node.cloned(), &error).await;
        if error.is_fatal() {
            error!(error = %error, "[gb-04] Fatal error, escalating");
            self.errors.escalate_fatal(&error).await;
        }
    }

    /// Run `fut` under the handler budget, substituting `on_timeout` on expiry.
    async fn bounded<T>(&self, node: NodeId, fut: impl Future<Output = T>, on_timeout: T) -> T {
        match tokio::time::timeout(self.config.handler_timeout, fut).await {
            Ok(value) => value,
            Err(_) => {
                self.report(
                    None,
                    PropagationError::Timeout {
                        node,
                        after: self.config.handler_timeout,
                    },
                )
                .await;
                on_timeout
            }
        }
    }

    async fn resolve_node(&self, node: NodeId) -> Option<NodeRef> {
        match self.platform.node(node).await {
            Ok(Some(found)) => Some(found),
            Ok(None) => {
                self.report(None, PropagationError::NodeNotFound(node))
                    .await;
                None
            }
            Err(source) => {
                self.report(None, PropagationError::LookupFailed { node, source })
                    .await;
                None
            }
        }
    }

    async fn ban_target(&self, order: &BanOrder, trusted: bool, node: NodeId) -> PropagationOutcome {
        let Some(target) = self.resolve_node(node).await else {
            return PropagationOutcome::ErrorFailure;
        };

        let mut action_succeeded = false;
        if trusted {
            match self
                .platform
                .ban_member(node, order.target_user.id, &order.audit_reason())
                .await
            {
                Ok(()) => action_succeeded = true,
                Err(source) => {
                    self.report(Some(&target), PropagationError::ActionFailed { node, source })
                        .await
                }
            }
        }

        let Some(channel) = self.directory.notification_channel(node).await else {
            debug!(node = %target, "[gb-04] No notification channel configured");
            return PropagationOutcome::from_steps(trusted, action_succeeded, false);
        };

        let message = if !trusted {
            OutgoingMessage::with_controls(
                notices::ban_not_trusted(order),
                vec![
                    Control::fallback(FallbackAction::ApplyBan(order.clone())),
                    Control::fallback(FallbackAction::ApplyBanAndTrust(order.clone())),
                ],
            )
        } else if action_succeeded {
            OutgoingMessage::plain(notices::ban_applied(order))
        } else {
            OutgoingMessage::with_controls(
                notices::ban_failed(order),
                vec![Control::fallback(FallbackAction::ApplyBan(order.clone()))],
            )
        };

        let alert_succeeded = match self.platform.send_message(node, channel, message).await {
            Ok(_) => true,
            Err(source) => {
                self.report(Some(&target), PropagationError::NoticeFailed { node, source })
                    .await;
                false
            }
        };

        let outcome = PropagationOutcome::from_steps(trusted, action_succeeded, alert_succeeded);
        debug!(node = %target, outcome = %outcome, "[gb-04] Target resolved");
        outcome
    }

    async fn alert_target(&self, request: &AlertRequest, node: NodeId) -> bool {
        let Some(target) = self.resolve_node(node).await else {
            return false;
        };
        let Some(channel) = self.directory.notification_channel(node).await else {
            debug!(node = %target, "[gb-04] No notification channel configured");
            return false;
        };
        match self
            .platform
            .send_message(node, channel, OutgoingMessage::plain(notices::alert(request)))
            .await
        {
            Ok(_) => true,
            Err(source) => {
                self.report(Some(&target), PropagationError::NoticeFailed { node, source })
                    .await;
                false
            }
        }
    }

    async fn onboard_target(&self, new_node: &NodeRef, node: NodeId) -> OnboardingOutcome {
        let mut outcome = OnboardingOutcome::default();

        if self.directory.trust_new_nodes(node).await {
            match self.trust.set_trust(node, new_node.id, true).await {
                Ok(()) => outcome.auto_trusted = true,
                Err(e) => self.report(None, PropagationError::Trust(e)).await,
            }
        }

        let Some(target) = self.resolve_node(node).await else {
            return outcome;
        };
        let Some(channel) = self.directory.notification_channel(node).await else {
            return outcome;
        };

        let text = notices::new_node(new_node, outcome.auto_trusted);
        let message = if outcome.auto_trusted {
            OutgoingMessage::plain(text)
        } else {
            OutgoingMessage::with_controls(
                text,
                vec![Control::fallback(FallbackAction::TrustNode {
                    node: new_node.clone(),
                })],
            )
        };
        match self.platform.send_message(node, channel, message).await {
            Ok(_) => outcome.notice_posted = true,
            Err(source) => {
                self.report(Some(&target), PropagationError::NoticeFailed { node, source })
                    .await
            }
        }
        outcome
    }

    async fn authorize(
        &self,
        invocation: &ControlInvocation,
        command: &str,
        default_permission: Permission,
    ) -> Result<bool, PropagationError> {
        Ok(self
            .authorization
            .can_invoke(
                invocation.operator.id,
                invocation.node,
                &CommandId::new(command),
                Some(default_permission),
                Some(invocation.channel),
            )
            .await?)
    }

    async fn apply_ban(
        &self,
        invocation: &ControlInvocation,
        order: &BanOrder,
        and_trust: bool,
    ) -> Result<FallbackOutcome, PropagationError> {
        if !self
            .authorize(invocation, GBAN_COMMAND, GBAN_COMMAND_PERMISSION)
            .await?
        {
            return Ok(FallbackOutcome::Denied(DenialReason::MissingBanPermission));
        }
        if and_trust
            && !self
                .authorize(invocation, TRUSTED_COMMAND, TRUSTED_COMMAND_PERMISSION)
                .await?
        {
            return Ok(FallbackOutcome::Denied(DenialReason::MissingTrustPermission));
        }

        let node = invocation.node;
        self.platform
            .ban_member(node, order.target_user.id, &order.audit_reason())
            .await
            .map_err(|source| PropagationError::ActionFailed { node, source })?;

        let reply = if and_trust {
            if node != order.origin.id {
                self.trust.set_trust(node, order.origin.id, true).await?;
            }
            notices::ban_applied_and_trusted(&invocation.operator)
        } else {
            notices::ban_applied_manually(&invocation.operator)
        };
        self.complete(invocation, reply).await;
        Ok(FallbackOutcome::Completed)
    }

    async fn trust_node(
        &self,
        invocation: &ControlInvocation,
        new_node: &NodeRef,
    ) -> Result<FallbackOutcome, PropagationError> {
        if !self
            .authorize(invocation, TRUSTED_COMMAND, TRUSTED_COMMAND_PERMISSION)
            .await?
        {
            return Ok(FallbackOutcome::Denied(DenialReason::MissingTrustPermission));
        }
        if invocation.node != new_node.id {
            self.trust
                .set_trust(invocation.node, new_node.id, true)
                .await?;
        }
        self.complete(invocation, notices::NODE_TRUSTED.to_string())
            .await;
        Ok(FallbackOutcome::Completed)
    }

    /// Disable the control and confirm. The action already happened, so
    /// failures here are reported but do not change the outcome.
    async fn complete(&self, invocation: &ControlInvocation, reply: String) {
        let node = invocation.node;
        if let Err(source) = self
            .platform
            .replace_control(
                node,
                invocation.channel,
                invocation.message,
                Control::completed(&invocation.action),
            )
            .await
        {
            self.report(None, PropagationError::InteractionFailed { node, source })
                .await;
        }
        self.reply(invocation, reply).await;
    }

    async fn reply(&self, invocation: &ControlInvocation, text: String) {
        let node = invocation.node;
        if let Err(source) = self
            .platform
            .send_message(node, invocation.channel, OutgoingMessage::plain(text))
            .await
        {
            self.report(None, PropagationError::InteractionFailed { node, source })
                .await;
        }
    }
}

#[async_trait]
impl GlobalBanApi for PropagationService {
    async fn initiate_propagation(&self, request: PropagationRequest) -> PropagationSummary {
        let PropagationRequest { order, targets } = request;

        // Sampled once; trust changes during the fan-out do not apply.
        let trusting = Arc::new(self.trust.who_trusts(order.origin.id));
        info!(
            origin = %order.origin,
            user = %order.target_user.id,
            targets = targets.len(),
            "[gb-04] Propagating global ban"
        );

        let order = Arc::new(order);
        let executor = FanOutExecutor::new(targets);
        let service = self.clone();
        let results = executor
            .run(move |node| {
                let service = service.clone();
                let order = Arc::clone(&order);
                let trusted = trusting.contains(&node);
                async move {
                    let steps = service.ban_target(&order, trusted, node);
                    service
                        .bounded(node, steps, PropagationOutcome::ErrorFailure)
                        .await
                }
            })
            .await;

        let mut summary = PropagationSummary::from_results(&results);
        for node in executor.targets() {
            if !results.contains_key(node) {
                summary.record(PropagationOutcome::ErrorFailure);
            }
        }

        info!(
            success = summary.success_count,
            non_trusted = summary.non_trusted_alert_count,
            fallback = summary.fallback_alert_count,
            failed = summary.failure_count,
            "[gb-04] Global ban propagated"
        );
        summary
    }

    async fn on_fallback_control_invoked(&self, invocation: ControlInvocation) -> FallbackOutcome {
        debug!(
            node = %invocation.node,
            operator = %invocation.operator.id,
            action = invocation.action.kind(),
            "[gb-04] Fallback control invoked"
        );

        let result = match &invocation.action {
            FallbackAction::ApplyBan(order) => self.apply_ban(&invocation, order, false).await,
            FallbackAction::ApplyBanAndTrust(order) => {
                self.apply_ban(&invocation, order, true).await
            }
            FallbackAction::TrustNode { node } => self.trust_node(&invocation, node).await,
        };

        match result {
            Ok(FallbackOutcome::Denied(reason)) => {
                self.reply(&invocation, reason.message(&invocation.operator))
                    .await;
                FallbackOutcome::Denied(reason)
            }
            Ok(outcome) => outcome,
            Err(e) => {
                let fatal = e.is_fatal();
                self.report(None, e).await;
                self.reply(&invocation, notices::GENERIC_ERROR_REPLY.to_string())
                    .await;
                FallbackOutcome::Failed { fatal }
            }
        }
    }

    async fn broadcast_alert(&self, request: AlertRequest) -> AlertSummary {
        info!(
            origin = %request.origin,
            user = %request.target_user.id,
            targets = request.targets.len(),
            "[gb-04] Broadcasting global alert"
        );

        let executor = FanOutExecutor::new(request.targets.iter().copied());
        let request = Arc::new(request);
        let service = self.clone();
        let mut results = executor
            .run(move |node| {
                let service = service.clone();
                let request = Arc::clone(&request);
                async move {
                    let steps = service.alert_target(&request, node);
                    service.bounded(node, steps, false).await
                }
            })
            .await;

        for node in executor.targets() {
            results.entry(*node).or_insert(false);
        }
        AlertSummary::from_results(&results)
    }

    async fn announce_new_node(
        &self,
        new_node: NodeRef,
        targets: BTreeSet<NodeId>,
    ) -> HashMap<NodeId, OnboardingOutcome> {
        info!(node = %new_node, "[gb-04] Announcing new server");

        let new_id = new_node.id;
        let executor = FanOutExecutor::new(targets.into_iter().filter(|n| *n != new_id));
        let new_node = Arc::new(new_node);
        let service = self.clone();
        executor
            .run(move |node| {
                let service = service.clone();
                let new_node = Arc::clone(&new_node);
                async move {
                    let steps = service.onboard_target(&new_node, node);
                    service
                        .bounded(node, steps, OnboardingOutcome::default())
                        .await
                }
            })
            .await
    }
}
