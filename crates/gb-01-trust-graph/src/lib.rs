//! # GB-01 Trust Graph
//!
//! Directed "source trusts destination" relation between nodes.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decide whether a moderation action issued in one node is pre-authorized
//! in another:
//! - `trusted_by(n)`: nodes `n` trusts (plus `n` itself)
//! - `who_trusts(n)`: nodes that trust `n` (plus `n` itself)
//! - `set_trust(s, d, bool)`: persist first, then update both indices
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Index symmetry | `(s,d)` in forward iff `(d,s)` in backward |
//! | Implicit self-trust | Added at query time, never stored |
//! | No silent repair | One-sided removal poisons the graph |
//!
//! ## Module Structure
//!
//! ```text
//! gb-01-trust-graph/
//! ├── domain/          # TrustEdge, TrustIndices, TrustError, invariants
//! ├── algorithms/      # Two-pass pre-sorted index construction
//! ├── ports/           # TrustApi (inbound), TrustStore (outbound)
//! ├── adapters/        # InMemoryTrustStore
//! └── service.rs       # TrustGraph
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::InMemoryTrustStore;
pub use algorithms::{build_indices, group_sorted};
pub use domain::{
    invariant_implicit_self_trust, invariant_index_symmetry, TrustEdge, TrustError, TrustIndices,
};
pub use ports::{TrustApi, TrustStore};
pub use service::TrustGraph;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
