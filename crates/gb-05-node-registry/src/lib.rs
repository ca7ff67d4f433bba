//! # GB-05 Node Registry
//!
//! Which nodes the bot may serve, and how each node wants to be notified.
//!
//! **Subsystem ID:** 5
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! | Component | State | Port |
//! |-----------|-------|------|
//! | [`Whitelist`] | node ids allowed to keep the bot (main node implicit) | [`WhitelistStore`] |
//! | [`SettingsRegistry`] | [`NodeSettings`] per node | [`SettingsStore`] |
//!
//! Both keep an in-memory copy behind a `RwLock`, loaded once at startup.
//! Writes are persisted first, with one reconnect retry.
//!
//! ## Module Structure
//!
//! ```text
//! gb-05-node-registry/
//! ├── domain/          # NodeSettings, active_targets, RegistryError
//! ├── ports/           # WhitelistStore, SettingsStore (outbound)
//! ├── adapters/        # In-memory stores
//! └── service.rs       # Whitelist, SettingsRegistry
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{InMemorySettingsStore, InMemoryWhitelistStore};
pub use domain::{active_targets, NodeSettings, RegistryError};
pub use ports::{SettingsStore, WhitelistStore};
pub use service::{SettingsRegistry, Whitelist};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
