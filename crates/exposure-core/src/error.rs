use std::path::PathBuf;
use thiserror::Error;

use crate::models::CategoryId;

/// All errors produced by the exposure monitor.
#[derive(Error, Debug)]
pub enum ExposureError {
    /// A snapshot file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The HTTP request itself failed (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {locator}")]
    HttpStatus { status: u16, locator: String },

    /// A snapshot locator could not be turned into a URL or path.
    #[error("Invalid snapshot locator '{locator}': {message}")]
    InvalidLocator { locator: String, message: String },

    /// A selection named a category that is not configured.
    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// The category configuration is empty, so nothing can be loaded.
    #[error("No categories configured")]
    NoCategories,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExposureError {
    /// Create an invalid-locator error.
    pub fn invalid_locator(locator: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidLocator {
            locator: locator.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience alias used throughout the exposure crates.
pub type Result<T> = std::result::Result<T, ExposureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ExposureError::FileRead {
            path: PathBuf::from("/data/latest_results_cancer.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/latest_results_cancer.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_http_status() {
        let err = ExposureError::HttpStatus {
            status: 404,
            locator: "http://host/data/x.json".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 for http://host/data/x.json");
    }

    #[test]
    fn test_error_display_invalid_locator() {
        let err = ExposureError::invalid_locator("::", "relative URL without a base");
        assert_eq!(
            err.to_string(),
            "Invalid snapshot locator '::': relative URL without a base"
        );
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = ExposureError::UnknownCategory(CategoryId::new("pets"));
        assert_eq!(err.to_string(), "Unknown category: pets");
    }

    #[test]
    fn test_error_display_no_categories() {
        assert_eq!(
            ExposureError::NoCategories.to_string(),
            "No categories configured"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = ExposureError::Config("missing base url".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing base url");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ExposureError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: ExposureError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
