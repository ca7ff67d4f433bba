//! # Property Tests

pub mod authorization;
pub mod trust_graph;
pub mod truth_table;
