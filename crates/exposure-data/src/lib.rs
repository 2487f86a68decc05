//! Data layer for the keyword exposure monitor.
//!
//! Parses per-category exposure snapshots, classifies every keyword,
//! merges categories into one dataset with precomputed summaries and
//! serves filtered, sorted, paginated views over it.

pub mod aggregator;
pub mod list_view;
pub mod merger;
pub mod normalizer;
pub mod reader;
pub mod selector;

pub use exposure_core as core;
