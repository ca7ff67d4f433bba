//! # Algorithms Module
//!
//! The override precedence evaluation.

pub mod precedence;

pub use precedence::*;
