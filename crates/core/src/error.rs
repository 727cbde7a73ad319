//! Error types for aiscout operations.
//!
//! Analysis, scoring and recommendation generation are total and never
//! return errors. [`AiscoutError`] covers the collaborators around them:
//! fetching pages, reading files, loading configuration, serializing
//! reports and calling a hosted advisor.
//!
//! # Example
//!
//! ```rust
//! use aiscout_core::{AiscoutError, Result};
//!
//! fn require_html(html: &str) -> Result<&str> {
//!     if html.trim().is_empty() {
//!         return Err(AiscoutError::EmptyDocument("stdin".to_string()));
//!     }
//!     Ok(html)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for page fetching and report plumbing.
///
/// # Example
///
/// ```rust
/// use aiscout_core::{AiscoutError, fetch_file};
///
/// match fetch_file("/does/not/exist.html") {
///     Ok(html) => println!("{} bytes", html.len()),
///     Err(AiscoutError::FileNotFound(path)) => println!("missing: {}", path.display()),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum AiscoutError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and non-success status codes.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector or otherwise unusable markup query.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The source answered but produced no HTML to analyze.
    #[error("No content returned from {0}")]
    EmptyDocument(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read and write errors.
    #[error("File read or write failed: {0}")]
    WriteError(#[from] std::io::Error),

    /// Configuration file missing fields or holding invalid values.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The generative advisor rejected the request or returned nothing usable.
    #[error("Advisor error: {0}")]
    AdvisorError(String),
}

/// Result type alias for AiscoutError.
pub type Result<T> = std::result::Result<T, AiscoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AiscoutError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_timeout_error() {
        let err = AiscoutError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_empty_document_error() {
        let err = AiscoutError::EmptyDocument("https://example.com".to_string());
        assert!(err.to_string().contains("https://example.com"));
    }

    #[test]
    fn test_serialization_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AiscoutError::from(json_err);
        assert!(matches!(err, AiscoutError::SerializationError(_)));
    }
}
