//! # Ports Module
//!
//! Persistence ports of the registry.

pub mod outbound;

pub use outbound::*;
