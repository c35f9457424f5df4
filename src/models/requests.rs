//! Request DTOs for the CRM JSON API
//!
//! Defines the structure of outgoing request bodies.

use serde::Serialize;

/// Request body for `POST /api/bulk-{action}/`
#[derive(Debug, Clone, Serialize)]
pub struct BulkActionRequest {
    /// Ids of the selected rows
    pub ids: Vec<String>,
}

impl BulkActionRequest {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.ids.is_empty() {
            return Some("Please select items".to_string());
        }
        None
    }
}
