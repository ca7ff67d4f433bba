//! # Domain Module
//!
//! Core domain types for the Propagation Protocol.

pub mod config;
pub mod controls;
pub mod errors;
pub mod notices;
pub mod outcome;
pub mod requests;
pub mod summary;

pub use config::*;
pub use controls::*;
pub use errors::*;
pub use outcome::*;
pub use requests::*;
pub use summary::*;
