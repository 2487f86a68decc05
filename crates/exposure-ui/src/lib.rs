//! Terminal UI layer for the keyword exposure monitor.
//!
//! Provides themes, the distribution bar and header components, the summary
//! and keywords tabs, and the main application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod keyword_view;
pub mod themes;

pub use exposure_core as core;
