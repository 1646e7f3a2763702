//! Analysis modules.
//!
//! Turns loaded samples into per-transaction aggregate rows.

pub mod aggregator;

pub use aggregator::*;
