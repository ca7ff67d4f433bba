//! # GB-04 Propagation Protocol
//!
//! Delivers one global ban to every target node, applying it automatically
//! where the target trusts the origin and posting fallback controls
//! everywhere else.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Operations
//!
//! | Operation | Fan-out | Result |
//! |-----------|---------|--------|
//! | `initiate_propagation` | every target | [`PropagationSummary`] |
//! | `on_fallback_control_invoked` | none | [`FallbackOutcome`] |
//! | `broadcast_alert` | every target | [`AlertSummary`] |
//! | `announce_new_node` | every target except the new node | per-node [`OnboardingOutcome`] |
//!
//! ## Dependencies
//!
//! | Subsystem | Used for |
//! |-----------|----------|
//! | GB-01 Trust Graph | who trusts the origin; trust added by controls |
//! | GB-02 Fan-Out | concurrent per-node dispatch |
//! | GB-03 Authorization | re-checking the operator who clicks a control |
//!
//! ## Module Structure
//!
//! ```text
//! gb-04-propagation/
//! ├── domain/          # BanOrder, outcomes, controls, summaries, notices
//! ├── ports/           # GlobalBanApi (inbound), ChatPlatform, NotificationDirectory, ErrorSink (outbound)
//! ├── testing.rs       # Recording test doubles
//! └── service.rs       # PropagationService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;
pub mod testing;

// Re-exports
pub use domain::{
    notices, AlertRequest, AlertSummary, BanOrder, Control, ControlId, ControlInvocation,
    DenialReason, FallbackAction, FallbackOutcome, PropagationConfig, PropagationError,
    PropagationOutcome, PropagationRequest, PropagationSummary, GBAN_COMMAND,
    GBAN_COMMAND_PERMISSION, TRUSTED_COMMAND, TRUSTED_COMMAND_PERMISSION,
};
pub use ports::{
    ChatPlatform, ErrorSink, GlobalBanApi, NotificationDirectory, OnboardingOutcome,
    OutgoingMessage,
};
pub use service::PropagationService;
pub use testing::{
    CollectingErrorSink, RecordedBan, RecordingChatPlatform, SentMessage,
    StaticNotificationDirectory,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
