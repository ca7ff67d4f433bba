//! # Operational Error Channel
//!
//! `ErrorSink` adapter. Every report is logged and, when an error channel
//! is configured, posted on the main server as
//!
//! ````text
//! <server name> (<server id>)
//! ```<error and its causes>```
//! ````
//!
//! truncated line-wise to fit one message. Posting failures are only logged.
//! Fatal escalations additionally flip the runtime shutdown signal.

use async_trait::async_trait;
use gb_01_trust_graph::TrustError;
use gb_03_authorization::AuthorizationError;
use gb_04_propagation::{ChatPlatform, ErrorSink, OutgoingMessage, PropagationError};
use gb_05_node_registry::RegistryError;
use gban_telemetry::record_error;
use shared_types::{ChannelId, NodeId, NodeRef, PlatformError, StoreError};
use std::error::Error;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, warn};

/// Longest message the chat platform accepts.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Code fence overhead around the error body.
const FENCE_LENGTH: usize = 6;

/// `(subsystem, error_type)` metric labels for a reported error.
pub fn error_labels(error: &(dyn Error + Send + Sync + 'static)) -> (&'static str, &'static str) {
    if let Some(e) = error.downcast_ref::<PropagationError>() {
        let kind = match e {
            PropagationError::NodeNotFound(_) => "node_not_found",
            PropagationError::LookupFailed { .. } => "lookup_failed",
            PropagationError::ActionFailed { .. } => "action_failed",
            PropagationError::NoticeFailed { .. } => "notice_failed",
            PropagationError::InteractionFailed { .. } => "interaction_failed",
            PropagationError::Timeout { .. } => "timeout",
            PropagationError::Authorization(_) => "authorization",
            PropagationError::Trust(_) => "trust",
        };
        return ("gb-04", kind);
    }
    if let Some(e) = error.downcast_ref::<TrustError>() {
        let kind = match e {
            TrustError::ReflexiveEdge(_) => "reflexive_edge",
            TrustError::Store(_) => "store",
            TrustError::IndexDivergence { .. } => "index_divergence",
            TrustError::Poisoned => "poisoned",
        };
        return ("gb-01", kind);
    }
    if error.downcast_ref::<AuthorizationError>().is_some() {
        return ("gb-03", "authorization");
    }
    if let Some(e) = error.downcast_ref::<RegistryError>() {
        let kind = match e {
            RegistryError::Store(_) => "store",
            RegistryError::MainNode(_) => "main_node",
        };
        return ("gb-05", kind);
    }
    if error.downcast_ref::<PlatformError>().is_some() {
        return ("runtime", "platform");
    }
    if error.downcast_ref::<StoreError>().is_some() {
        return ("runtime", "store");
    }
    ("runtime", "other")
}

/// Keep as many leading lines of `text` as fit in `max_chars` together with
/// a `[+N lines]` marker for the rest. A text whose first line alone does
/// not fit is cut at `max_chars` characters.
pub fn truncate_lines(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let lines: Vec<&str> = text.split('\n').collect();
    // prefix[k]: characters in the first k lines joined with '\n'
    let mut prefix = Vec::with_capacity(lines.len() + 1);
    prefix.push(0usize);
    for (i, line) in lines.iter().enumerate() {
        let separator = usize::from(i > 0);
        prefix.push(prefix[i] + line.chars().count() + separator);
    }

    for kept in (1..lines.len()).rev() {
        let marker = format!("\n[+{} lines]", lines.len() - kept);
        if prefix[kept] + marker.chars().count() <= max_chars {
            return format!("{}{}", lines[..kept].join("\n"), marker);
        }
    }

    text.chars().take(max_chars).collect()
}

/// Render `error` followed by its chain of causes.
pub fn render_error(error: &(dyn Error + Send + Sync + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(text, "\nCaused by: {}", cause);
        source = cause.source();
    }
    text
}

/// Operational error channel on the main node.
pub struct ErrorChannel {
    platform: Arc<dyn ChatPlatform>,
    main_node: NodeId,
    channel: Option<ChannelId>,
    shutdown: watch::Sender<bool>,
}

impl ErrorChannel {
    /// Create an error channel. `channel` unset means log-only.
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        main_node: NodeId,
        channel: Option<ChannelId>,
        shutdown: watch::Sender<bool>,
    ) -> Self {
        Self {
            platform,
            main_node,
            channel,
            shutdown,
        }
    }

    /// Receiver flipped to `true` on a fatal escalation.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Log `text` and post it to the error channel, attributed to `node`.
    pub async fn post(&self, node: Option<&NodeRef>, text: &str) {
        match node {
            Some(node) => error!(node = %node, "[runtime] {}", text),
            None => error!("[runtime] {}", text),
        }

        let Some(channel) = self.channel else {
            return;
        };

        let mut message = node.map(|n| format!("{}\n", n)).unwrap_or_default();
        let budget = MAX_MESSAGE_LENGTH.saturating_sub(FENCE_LENGTH + message.chars().count());
        message.push_str(&format!("```{}```", truncate_lines(text, budget)));

        if let Err(e) = self
            .platform
            .send_message(self.main_node, channel, OutgoingMessage::plain(message))
            .await
        {
            // Not reported again: this is the reporting path.
            warn!(
                channel = %channel,
                error = %e,
                "[runtime] Failed to post to the error channel"
            );
        }
    }

    /// Flip the shutdown signal.
    pub fn trigger_shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

#[async_trait]
impl ErrorSink for ErrorChannel {
    async fn report(
        &self,
        node: Option<NodeRef>,
        error: &(dyn Error + Send + Sync + 'static),
    ) {
        let (subsystem, kind) = error_labels(error);
        record_error(subsystem, kind);
        self.post(node.as_ref(), &render_error(error)).await;
    }

    async fn escalate_fatal(&self, error: &(dyn Error + Send + Sync + 'static)) {
        let (subsystem, _) = error_labels(error);
        record_error(subsystem, "fatal");
        self.post(None, &format!("FATAL: {}", render_error(error)))
            .await;
        error!("[runtime] Internal consistency failure, shutting down");
        self.trigger_shutdown();
    }
}
