//! Analysis modules.
//!
//! Aggregation of registration times collected over a full pass.

pub mod aggregator;

pub use aggregator::*;
