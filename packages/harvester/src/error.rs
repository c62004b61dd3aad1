//! Error types for the harvester.
//!
//! Only the browsing and output layers can fail. Field extraction and
//! record assembly degrade to sentinel values instead of returning errors.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// List URL is not an absolute http(s) URL.
    #[error("Invalid list URL: '{0}'. Expected an absolute http(s) URL")]
    InvalidUrl(String),

    /// Requested project count is out of range.
    #[error("Invalid project count: {0}. Expected at least 1")]
    InvalidCount(usize),

    /// A CSS selector failed to compile.
    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// A label could not be turned into a match pattern.
    #[error("Invalid label pattern: {0}")]
    LabelPattern(#[from] regex::Error),

    /// WebDriver command failed.
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    /// WebDriver endpoint answered but reported it cannot create sessions.
    #[error("WebDriver at {url} is not available: {message}")]
    WebDriverUnavailable { url: String, message: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// All retry attempts failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// A bounded wait ran out.
    #[error("Timed out after {secs}s waiting for {what}")]
    Timeout { what: String, secs: u64 },

    /// The project list table never rendered any rows.
    #[error("Project list table has no rows")]
    ProjectTableEmpty,

    /// A listed row is gone when the list is reloaded.
    #[error("Project row {index} not found (list has {rows} rows)")]
    ProjectRowMissing { index: usize, rows: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvesterError {
    /// Whether a failed project attempt is worth repeating.
    ///
    /// Only WebDriver command failures such as stale rows qualify.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WebDriver(_))
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarvesterError::InvalidUrl("ftp://example".to_string());
        assert!(err.to_string().contains("ftp://example"));
        assert!(err.to_string().contains("http(s)"));
    }

    #[test]
    fn test_timeout_display() {
        let err = HarvesterError::Timeout {
            what: "project list rows".to_string(),
            secs: 40,
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 40s waiting for project list rows"
        );
    }

    #[test]
    fn test_retries_exhausted_display() {
        let err = HarvesterError::RetriesExhausted {
            attempts: 3,
            message: "Server error: 503".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed after 3 attempts: Server error: 503"
        );
    }

    #[test]
    fn test_skips_are_not_retryable() {
        let missing = HarvesterError::ProjectRowMissing { index: 7, rows: 5 };
        assert_eq!(
            missing.to_string(),
            "Project row 7 not found (list has 5 rows)"
        );
        assert!(!missing.is_retryable());

        let timeout = HarvesterError::Timeout {
            what: "project name".to_string(),
            secs: 20,
        };
        assert!(!timeout.is_retryable());
    }
}
