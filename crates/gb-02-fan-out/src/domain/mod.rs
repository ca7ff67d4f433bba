//! # Domain Module
//!
//! Error types for the Fan-Out Executor.

pub mod errors;

pub use errors::*;
