//! Data Transfer Objects for the HTTP API.
//!
//! Request parameters are captured as raw key/value pairs so that malformed
//! or repeated values reach the validators and produce the API's own error
//! messages instead of an extractor rejection.

use serde::{Deserialize, Serialize};

pub use crate::api::{DifficultyAverage, RatingStats, Song};

/// Query-string or form fields in request order.
///
/// Lookups return the first occurrence of a key, so a repeated parameter
/// never fails extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFields(Vec<(String, String)>);

impl RequestFields {
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Vec<(String, String)>> for RequestFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        RequestFields(pairs)
    }
}

/// Acknowledgement returned by state-changing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Database connection status
    pub database: String,
}
