//! # Adapters
//!
//! In-memory implementations of the registry stores.

pub mod memory_store;

pub use memory_store::{InMemorySettingsStore, InMemoryWhitelistStore};
