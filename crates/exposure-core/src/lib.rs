//! Shared domain types for the keyword exposure monitor.
//!
//! Holds the keyword/summary models, the static category registry, the
//! unified error type, CLI settings and display formatting helpers.

pub mod categories;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{ExposureError, Result};
