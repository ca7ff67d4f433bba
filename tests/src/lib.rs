//! # GBan Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── integration/      # Cross-subsystem flows
//! │   ├── scenarios.rs  # Single-target propagation scenarios and fallback clicks
//! │   ├── runtime.rs    # Full bot: container + command handlers
//! │   └── fan_out.rs    # Completeness under random completion order
//! │
//! └── properties/       # proptest suites
//!     ├── trust_graph.rs
//!     ├── truth_table.rs
//!     └── authorization.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p gb-tests
//!
//! # By category
//! cargo test -p gb-tests integration::
//! cargo test -p gb-tests properties::
//!
//! # Benchmarks
//! cargo bench -p gb-tests
//! ```

pub mod integration;
pub mod properties;
