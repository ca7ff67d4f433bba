//! # Domain Module
//!
//! Node settings and registry errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
