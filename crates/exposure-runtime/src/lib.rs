//! Runtime layer for the keyword exposure monitor.
//!
//! Fetches category snapshots concurrently from HTTP or the filesystem,
//! merges them into datasets, and drives reload cycles in the background
//! while discarding results that a newer cycle has superseded.

pub mod data_manager;
pub mod orchestrator;
pub mod source;

pub use exposure_core as core;
pub use exposure_data as data;
