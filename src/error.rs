//! Custom error types for audit-trail
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for audit-trail operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// XML serialization errors
    #[error("XML error: {0}")]
    Xml(String),

    /// An existing log value could not be parsed
    #[error("Corrupt {format} audit log: {reason}")]
    Corrupt {
        format: &'static str,
        reason: String,
    },

    /// Invalid caller-supplied arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl AuditError {
    /// Create a corruption error for an XML log
    pub fn corrupt_xml(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            format: "xml",
            reason: reason.into(),
        }
    }

    /// Create a corruption error for a JSON log
    pub fn corrupt_json(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            format: "json",
            reason: reason.into(),
        }
    }

    /// Check if this error reports an unparsable existing log
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for audit-trail operations
pub type AuditResult<T> = Result<T, AuditError>;
