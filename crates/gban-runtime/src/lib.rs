//! # GBan Runtime Library
//!
//! Wires the subsystems into a running bot and exposes the handlers the
//! chat platform integration drives. The entry point is the `main.rs`
//! binary.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | `container` | `RuntimeConfig` from env, `Stores`, `ServiceContainer` |
//! | `adapters` | `ErrorChannel`, `SettingsDirectory`, RocksDB storage (feature `rocksdb`) |
//! | `handlers` | `CommandHandler`, `NodeJoinHandler` |
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load and validate configuration
//! 3. Open the storage backend
//! 4. Build the container (trust graph → registry → authorization → propagation)
//! 5. Leave servers that are not whitelisted
//! 6. Run until Ctrl+C or a fatal error

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod container;
pub mod handlers;

// Re-exports
pub use adapters::{ErrorChannel, SettingsDirectory};
pub use container::{ContainerError, RuntimeConfig, ServiceContainer, Stores};
pub use handlers::{CommandContext, CommandHandler, NodeJoinHandler};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
