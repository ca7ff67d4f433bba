//! # Integration Tests
//!
//! Subsystems wired together with the recording test doubles.

pub mod fan_out;
pub mod runtime;
pub mod scenarios;
