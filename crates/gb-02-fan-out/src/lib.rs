//! # GB-02 Fan-Out Executor
//!
//! Runs one asynchronous operation per target node concurrently and
//! collects the results into a map keyed by node.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | Exactly-once per target | Targets deduplicated, one task each |
//! | Logical concurrency | `tokio::spawn` per target, no pool limit |
//! | No lost updates | Result map written inside a `parking_lot::Mutex` |
//! | Join-all barrier | `futures::future::join_all` over every handle |
//!
//! There is no built-in timeout and no cancellation. A handler that must
//! not stall the batch bounds itself (see `gb-04-propagation`).
//!
//! ## Module Structure
//!
//! ```text
//! gb-02-fan-out/
//! ├── domain/          # FanOutError
//! └── executor.rs      # FanOutExecutor
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod executor;

// Re-exports
pub use domain::FanOutError;
pub use executor::{fan_out, FanOutExecutor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
