//! Error types for the CRM client
//!
//! Provides unified error handling using thiserror.

use std::fmt;

use thiserror::Error;

// == Field Error ==
/// A single failed field check, used to annotate the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name (the form input's `name`)
    pub field: String,
    /// Message shown next to the field
    pub message: String,
}

impl FieldError {
    /// Creates a new FieldError
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// == CRM Error Enum ==
/// Unified error type for the CRM client.
#[derive(Error, Debug)]
pub enum CrmError {
    /// Non-success HTTP status or transport failure
    #[error("Network error: {message}")]
    Network {
        /// HTTP status, None when the request never produced a response
        status: Option<u16>,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Required/format field checks failed; never sent to the server
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Request could not be built (bad URL, bad option)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Local file access (drafts, exports)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrmError {
    /// Builds a network error for a non-success status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        CrmError::Network {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Builds a validation error with a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CrmError::Validation(vec![FieldError::new(field, message)])
    }

    /// Returns the HTTP status of a network error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CrmError::Network { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the field errors of a validation error, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            CrmError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for CrmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CrmError::Decode(err.to_string());
        }
        CrmError::Network {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(err: serde_json::Error) -> Self {
        CrmError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for CrmError {
    fn from(err: url::ParseError) -> Self {
        CrmError::InvalidRequest(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the CRM client.
pub type Result<T> = std::result::Result<T, CrmError>;
