//! Result and error types for medprobe.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for medprobe operations
pub type MedResult<T> = Result<T, MedError>;

/// Fixed message reported when an invalid-login attempt yields no message.
pub const LOGIN_MESSAGE_UNAVAILABLE: &str =
    "Login failed, and error message could not be retrieved.";

/// Errors that can occur while driving the suite
#[derive(Debug, Error)]
pub enum MedError {
    /// Fixture file, table, or required column is missing
    #[error("Fixture data not found in {file} (table {table:?}): {detail}")]
    DataNotFound {
        /// Fixture file path
        file: PathBuf,
        /// Table (sheet) name
        table: String,
        /// What was missing
        detail: String,
    },

    /// Element could not be resolved, was not visible, or rejected the interaction
    #[error("Interaction with {locator} failed: {message}")]
    Interaction {
        /// Display name of the locator
        locator: String,
        /// Error message
        message: String,
    },

    /// Actual UI state differs from the expected value
    #[error("Assertion failed: {message}")]
    AssertionMismatch {
        /// Error message
        message: String,
    },

    /// The invalid-login flow could not read the error banner
    #[error("{}", LOGIN_MESSAGE_UNAVAILABLE)]
    LoginMessageUnavailable {
        /// Underlying failure
        #[source]
        source: Box<MedError>,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was being waited for
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MedError {
    /// Create an interaction error for a locator
    #[must_use]
    pub fn interaction(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Interaction {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// Create an assertion mismatch
    #[must_use]
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::AssertionMismatch {
            message: message.into(),
        }
    }

    /// Create a data-not-found error
    #[must_use]
    pub fn data_not_found(
        file: impl Into<PathBuf>,
        table: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::DataNotFound {
            file: file.into(),
            table: table.into(),
            detail: detail.into(),
        }
    }

    /// Whether this error belongs to the DataNotFound category
    #[must_use]
    pub const fn is_data_not_found(&self) -> bool {
        matches!(self, Self::DataNotFound { .. })
    }

    /// Whether this error belongs to the InteractionError category
    ///
    /// Timeouts while waiting for an element count as interaction failures.
    #[must_use]
    pub const fn is_interaction(&self) -> bool {
        matches!(self, Self::Interaction { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_login_message_keeps_cause() {
        let err = MedError::LoginMessageUnavailable {
            source: Box::new(MedError::interaction("login error banner", "not attached")),
        };
        assert_eq!(err.to_string(), LOGIN_MESSAGE_UNAVAILABLE);
        let cause = err.source().expect("cause should be attached");
        assert!(cause.to_string().contains("login error banner"));
    }

    #[test]
    fn test_categories() {
        assert!(MedError::data_not_found("a.xlsx", "Login", "no such table").is_data_not_found());
        assert!(MedError::Timeout {
            what: "admin menu".into(),
            ms: 20_000
        }
        .is_interaction());
        assert!(!MedError::mismatch("x").is_interaction());
    }

    #[test]
    fn test_data_not_found_display_names_table() {
        let err = MedError::data_not_found("data/Result.xlsx", "Login", "table does not exist");
        let text = err.to_string();
        assert!(text.contains("Result.xlsx"));
        assert!(text.contains("\"Login\""));
    }
}
