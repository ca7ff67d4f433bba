//! # Algorithms Module
//!
//! Index construction for the Trust Graph.

pub mod index_builder;

pub use index_builder::*;
