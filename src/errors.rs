//! Error types for the request journal
//!
//! Not-found and no-match outcomes are never errors here. They come back as
//! `None`, a zero count or an empty list. Only operations that cannot be
//! answered at all produce a `JournalError`.

use thiserror::Error;

/// Main error type for the journal and its collaborators
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Request journal is disabled: {operation} requires a journal")]
    Disabled { operation: String },

    #[error("Verification failed: expected {expected} but received {actual}")]
    Verification { expected: String, actual: i64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to buffer body: {context} - {source}")]
    Body {
        context: String,
        #[source]
        source: axum::Error,
    },

    #[error("Invalid base64 body")]
    Encoding {
        #[source]
        source: base64::DecodeError,
    },

    #[error("Invalid request pattern: {source}")]
    Pattern {
        #[source]
        source: regex::Error,
    },
}

/// Type alias for Result with JournalError
pub type JournalResult<T> = Result<T, JournalError>;

impl JournalError {
    /// Create a disabled-journal error for the named operation
    pub fn disabled(operation: impl Into<String>) -> Self {
        Self::Disabled {
            operation: operation.into(),
        }
    }

    /// Create a verification error
    pub fn verification(expected: impl Into<String>, actual: i64) -> Self {
        Self::Verification {
            expected: expected.into(),
            actual,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a body buffering error
    pub fn body(context: impl Into<String>, source: axum::Error) -> Self {
        Self::Body {
            context: context.into(),
            source,
        }
    }

    /// True when the error only says the journal is switched off
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled { .. })
    }
}

/// Convert from figment errors
impl From<figment::Error> for JournalError {
    fn from(err: figment::Error) -> Self {
        JournalError::config(err.to_string())
    }
}

/// Convert from base64 errors
impl From<base64::DecodeError> for JournalError {
    fn from(err: base64::DecodeError) -> Self {
        JournalError::Encoding { source: err }
    }
}
