//! # Command Handlers
//!
//! Operator commands as plain methods returning the reply text. Command
//! registration and option parsing belong to the chat platform
//! integration and are not part of this crate.
//!
//! | Command | Scope | Methods |
//! |---------|-------|---------|
//! | `gban` | any whitelisted server | [`CommandHandler::global_ban`] |
//! | `alert` | any whitelisted server | [`CommandHandler::global_alert`] |
//! | `trusted` | any whitelisted server | `trusted_show`, `trusted_add`, `trusted_remove` |
//! | `whitelist` | main server only | `whitelist_show`, `whitelist_add`, `whitelist_remove` |
//! | `settings` | any whitelisted server | `settings_show`, `set_notification_channel`, `set_trust_new_nodes` |
//!
//! Unexpected failures are reported to the error channel and answered with
//! [`notices::GENERIC_ERROR_REPLY`].

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::sync::Arc;

use gb_01_trust_graph::TrustApi;
use gb_04_propagation::{
    notices, AlertRequest, BanOrder, ChatPlatform, ControlInvocation, ErrorSink,
    FallbackOutcome, GlobalBanApi, PropagationOutcome, PropagationRequest,
};
use gban_telemetry::{
    metric_inc, FALLBACK_INVOCATIONS, PROPAGATION_DURATION, PROPAGATION_OUTCOMES,
};
use shared_types::{Actor, ChannelId, NodeId, NodeRef, PlatformError};
use tracing::{info, warn};

use crate::container::ServiceContainer;

/// Reply to a command run in a server that is not whitelisted.
pub const NOT_WHITELISTED_REPLY: &str = "Error: Server is not whitelisted.";
/// Reply to a main-server command run elsewhere.
pub const MAIN_NODE_ONLY_REPLY: &str = "Error: This command can only be used in the main server.";
/// Reply to an unparsable server id.
pub const INVALID_NODE_ID_REPLY: &str = "Error: The provided server ID is not valid.";

/// Where a command was run and by whom.
#[derive(Clone, Debug)]
pub struct CommandContext {
    /// Server the command was run in.
    pub node: NodeRef,
    /// Channel the command was run in.
    pub channel: ChannelId,
    /// Operator running the command.
    pub operator: Actor,
}

fn parse_node_id(raw: &str) -> Option<NodeId> {
    raw.trim().parse::<u64>().ok().map(NodeId)
}

fn node_line(names: &BTreeMap<NodeId, String>, node: NodeId) -> String {
    match names.get(&node) {
        Some(name) => format!("- {} ({})", name, node),
        None => format!("- ({})", node),
    }
}

/// Operator command handlers.
pub struct CommandHandler {
    container: Arc<ServiceContainer>,
}

impl CommandHandler {
    /// Create handlers over a built container.
    pub fn new(container: Arc<ServiceContainer>) -> Self {
        Self { container }
    }

    fn reject(&self, ctx: &CommandContext, main_node_only: bool) -> Option<String> {
        if !self.container.whitelist.is_whitelisted(ctx.node.id) {
            return Some(NOT_WHITELISTED_REPLY.to_string());
        }
        if main_node_only && ctx.node.id != self.container.whitelist.main_node() {
            return Some(MAIN_NODE_ONLY_REPLY.to_string());
        }
        None
    }

    async fn fail(
        &self,
        ctx: &CommandContext,
        error: &(dyn Error + Send + Sync + 'static),
        fatal: bool,
    ) -> String {
        warn!(node = %ctx.node, error = %error, "[runtime] Command failed");
        self.container
            .errors
            .report(Some(ctx.node.clone()), error)
            .await;
        if fatal {
            self.container.errors.escalate_fatal(error).await;
        }
        notices::GENERIC_ERROR_REPLY.to_string()
    }

    async fn member_nodes(&self) -> Result<Vec<NodeRef>, PlatformError> {
        self.container.platform.member_nodes().await
    }

    async fn node_names(&self) -> Result<BTreeMap<NodeId, String>, PlatformError> {
        Ok(self
            .member_nodes()
            .await?
            .into_iter()
            .map(|n| (n.id, n.name))
            .collect())
    }

    // =========================================================================
    // gban / alert
    // =========================================================================

    /// Ban `target_user` on every whitelisted server the bot is a member of.
    pub async fn global_ban(&self, ctx: &CommandContext, target_user: Actor, reason: &str) -> String {
        if let Some(reply) = self.reject(ctx, false) {
            return reply;
        }
        info!(
            node = %ctx.node,
            operator = %ctx.operator.name,
            target = %target_user.id,
            "[runtime] gban"
        );

        let members = match self.member_nodes().await {
            Ok(members) => members,
            Err(e) => return self.fail(ctx, &e, false).await,
        };
        let targets = self
            .container
            .whitelist
            .active_targets(members.iter().map(|n| n.id));

        let target_name = target_user.name.clone();
        let order = BanOrder {
            issuer: ctx.operator.clone(),
            origin: ctx.node.clone(),
            target_user,
            reason: reason.to_string(),
        };

        let summary = {
            let _timer = gban_telemetry::time_histogram!(PROPAGATION_DURATION);
            self.container
                .propagation
                .initiate_propagation(PropagationRequest::new(order, targets))
                .await
        };
        for outcome in PropagationOutcome::ALL {
            let count = summary.count(outcome);
            if count > 0 {
                PROPAGATION_OUTCOMES
                    .with_label_values(&[outcome.label()])
                    .inc_by(count as f64);
            }
        }

        summary.render(&target_name)
    }

    /// Post an alert about `target_user` on every server the bot is a member of.
    pub async fn global_alert(
        &self,
        ctx: &CommandContext,
        target_user: Actor,
        message: &str,
    ) -> String {
        if let Some(reply) = self.reject(ctx, false) {
            return reply;
        }

        let members = match self.member_nodes().await {
            Ok(members) => members,
            Err(e) => return self.fail(ctx, &e, false).await,
        };
        let target_name = target_user.name.clone();
        let request = AlertRequest {
            issuer: ctx.operator.clone(),
            origin: ctx.node.clone(),
            target_user,
            message: message.to_string(),
            targets: members.iter().map(|n| n.id).collect(),
        };

        self.container
            .propagation
            .broadcast_alert(request)
            .await
            .render(&target_name)
    }

    /// Forward a click on a fallback control and record the outcome.
    pub async fn on_control_invoked(&self, invocation: ControlInvocation) -> FallbackOutcome {
        let kind = invocation.action.kind();
        let outcome = self
            .container
            .propagation
            .on_fallback_control_invoked(invocation)
            .await;
        metric_inc!(FALLBACK_INVOCATIONS, &[kind, outcome.label()]);
        self.container.record_trust_edges();
        outcome
    }

    // =========================================================================
    // trusted
    // =========================================================================

    /// List the servers trusted by this server, then every other server.
    pub async fn trusted_show(&self, ctx: &CommandContext) -> String {
        if let Some(reply) = self.reject(ctx, false) {
            return reply;
        }
        let names = match self.node_names().await {
            Ok(names) => names,
            Err(e) => return self.fail(ctx, &e, false).await,
        };

        let trusted: BTreeSet<NodeId> = self
            .container
            .trust
            .trusted_by(ctx.node.id)
            .into_iter()
            .filter(|n| *n != ctx.node.id)
            .collect();

        let mut reply = format!("Trusted servers for {}:", ctx.node.name);
        for node in &trusted {
            reply.push('\n');
            reply.push_str(&node_line(&names, *node));
        }
        reply.push_str("\nOther servers:");
        for node in names.keys() {
            if *node != ctx.node.id && !trusted.contains(node) {
                reply.push('\n');
                reply.push_str(&node_line(&names, *node));
            }
        }
        reply
    }

    /// Trust the server with id `raw_node` from this server.
    pub async fn trusted_add(&self, ctx: &CommandContext, raw_node: &str) -> String {
        self.set_trust(ctx, raw_node, true).await
    }

    /// Stop trusting the server with id `raw_node` from this server.
    pub async fn trusted_remove(&self, ctx: &CommandContext, raw_node: &str) -> String {
        self.set_trust(ctx, raw_node, false).await
    }

    async fn set_trust(&self, ctx: &CommandContext, raw_node: &str, trust: bool) -> String {
        if let Some(reply) = self.reject(ctx, false) {
            return reply;
        }
        let Some(node) = parse_node_id(raw_node) else {
            return INVALID_NODE_ID_REPLY.to_string();
        };
        let (verb, preposition) = if trust { ("add", "to") } else { ("remove", "from") };
        if node == ctx.node.id {
            return format!(
                "You cannot {} your own server {} the trusted list.",
                verb, preposition
            );
        }

        match self.container.trust.set_trust(ctx.node.id, node, trust).await {
            Ok(()) => {
                self.container.record_trust_edges();
                let done = if trust { "added" } else { "removed" };
                format!(
                    "Successfully {} the server {} the trusted list.",
                    done, preposition
                )
            }
            Err(e) => {
                let fatal = e.is_fatal();
                self.fail(ctx, &e, fatal).await
            }
        }
    }

    // =========================================================================
    // whitelist
    // =========================================================================

    /// List whitelisted servers, main server first.
    pub async fn whitelist_show(&self, ctx: &CommandContext) -> String {
        if let Some(reply) = self.reject(ctx, true) {
            return reply;
        }
        let names = match self.node_names().await {
            Ok(names) => names,
            Err(e) => return self.fail(ctx, &e, false).await,
        };

        let main = self.container.whitelist.main_node();
        let mut reply = String::from("Whitelisted servers:");
        reply.push('\n');
        reply.push_str(&node_line(&names, main));
        reply.push_str(" (Implicit - Main server)");
        for node in self.container.whitelist.all_nodes() {
            if node != main {
                reply.push('\n');
                reply.push_str(&node_line(&names, node));
            }
        }
        reply
    }

    /// Whitelist the server with id `raw_node`.
    pub async fn whitelist_add(&self, ctx: &CommandContext, raw_node: &str) -> String {
        if let Some(reply) = self.reject(ctx, true) {
            return reply;
        }
        let Some(node) = parse_node_id(raw_node) else {
            return INVALID_NODE_ID_REPLY.to_string();
        };
        match self.container.whitelist.add(node).await {
            Ok(_) => "Successfully added the server to the whitelist.".to_string(),
            Err(e) => self.fail(ctx, &e, false).await,
        }
    }

    /// Remove the server with id `raw_node` from the whitelist and leave it.
    pub async fn whitelist_remove(&self, ctx: &CommandContext, raw_node: &str) -> String {
        if let Some(reply) = self.reject(ctx, true) {
            return reply;
        }
        let Some(node) = parse_node_id(raw_node) else {
            return INVALID_NODE_ID_REPLY.to_string();
        };
        if node == self.container.whitelist.main_node() {
            return "The main server is always whitelisted and cannot be removed.".to_string();
        }

        if let Err(e) = self.container.whitelist.remove(node).await {
            return self.fail(ctx, &e, false).await;
        }
        if !self.container.whitelist.is_whitelisted(node) {
            match self.container.platform.node(node).await {
                Ok(Some(_)) => {
                    if let Err(e) = self.container.platform.leave_node(node).await {
                        return self.fail(ctx, &e, false).await;
                    }
                    info!(node = %node, "[runtime] Left server removed from the whitelist");
                }
                Ok(None) => {}
                Err(e) => return self.fail(ctx, &e, false).await,
            }
        }
        "Successfully removed the server from the whitelist.".to_string()
    }

    // =========================================================================
    // settings
    // =========================================================================

    /// Show the settings of this server.
    pub async fn settings_show(&self, ctx: &CommandContext) -> String {
        if let Some(reply) = self.reject(ctx, false) {
            return reply;
        }
        let settings = self.container.settings.get(ctx.node.id);
        let channel = settings
            .notification_channel
            .map(|c| format!("<#{}>", c))
            .unwrap_or_else(|| "None".to_string());
        let trust = if settings.trust_new_nodes { "Yes" } else { "No" };
        format!(
            "Settings for {}:\n- Notifications channel: {}\n- Trust new servers by default: {}",
            ctx.node.name, channel, trust
        )
    }

    /// Set or clear the notification channel of this server.
    pub async fn set_notification_channel(
        &self,
        ctx: &CommandContext,
        channel: Option<ChannelId>,
    ) -> String {
        if let Some(reply) = self.reject(ctx, false) {
            return reply;
        }
        match self
            .container
            .settings
            .set_notification_channel(ctx.node.id, channel)
            .await
        {
            Ok(()) => match channel {
                Some(channel) => format!("Notifications channel set to <#{}>.", channel),
                None => "Notifications have been disabled.".to_string(),
            },
            Err(e) => self.fail(ctx, &e, false).await,
        }
    }

    /// Enable or disable trusting servers the bot joins later.
    pub async fn set_trust_new_nodes(&self, ctx: &CommandContext, enabled: bool) -> String {
        if let Some(reply) = self.reject(ctx, false) {
            return reply;
        }
        match self
            .container
            .settings
            .set_trust_new_nodes(ctx.node.id, enabled)
            .await
        {
            Ok(()) if enabled => {
                "New servers the bot is added to will be automatically trusted.".to_string()
            }
            Ok(()) => {
                "New servers the bot is added to will no longer be automatically trusted."
                    .to_string()
            }
            Err(e) => self.fail(ctx, &e, false).await,
        }
    }
}
