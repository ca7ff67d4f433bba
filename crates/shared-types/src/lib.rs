//! # Shared Types Crate
//!
//! Identifiers, permissions and error types used across all GBan subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every identifier that crosses a subsystem
//!   boundary (node, user, channel, role, message) is defined here as a newtype.
//! - **Typed failures**: Persistence and chat-platform failures are separate
//!   enums so callers can tell a transient disconnect from a hard failure.
//! - **One retry**: [`with_reconnect`] is the only retry policy in the system.

pub mod entities;
pub mod errors;
pub mod persistence;

pub use entities::*;
pub use errors::*;
pub use persistence::{with_reconnect, Reconnect};
