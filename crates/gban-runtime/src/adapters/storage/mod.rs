//! # Storage Adapters
//!
//! The in-memory stores live with their subsystems and are always
//! available. Enable the `rocksdb` feature for persistent storage:
//!
//! ```toml
//! gban-runtime = { path = "...", features = ["rocksdb"] }
//! ```

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{
    RocksDbConfig, RocksDbStore, CF_SETTINGS, CF_TRUSTED_NODES, CF_WHITELIST, COLUMN_FAMILIES,
};

// Re-export in-memory adapters
pub use gb_01_trust_graph::InMemoryTrustStore;
pub use gb_05_node_registry::{InMemorySettingsStore, InMemoryWhitelistStore};
