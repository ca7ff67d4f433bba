//! # Adapters Module
//!
//! In-memory implementation of the trust persistence port.

pub mod memory_store;

pub use memory_store::InMemoryTrustStore;
