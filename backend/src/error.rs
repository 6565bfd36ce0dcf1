//! Request-scoped error type for the song API.
//!
//! Every failure a handler can report is one of these variants. The HTTP layer
//! turns them into the `{"message": ...}` envelope with [`ApiError::status_code`].

use crate::db::repository::RepositoryError;

/// Result type for request handling.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned from parameter validation and catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Parameter present but fails type, range or enum validation.
    #[error("\"{value}\" is not a valid argument for parameter \"{param}\"")]
    InvalidArgument { value: String, param: String },

    /// Required parameter absent.
    #[error("argument \"{param}\" is required for endpoint \"{endpoint}\"")]
    MissingRequiredArgument { param: String, endpoint: String },

    /// Referenced song does not exist.
    #[error("song_id \"{id}\" not found")]
    ObjectNotFound { id: String },

    /// Request body or query string could not be decoded at all.
    #[error("malformed request: {message}")]
    MalformedRequest { message: String },

    /// The document store call failed.
    #[error("internal error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    pub fn invalid_argument(value: impl Into<String>, param: impl Into<String>) -> Self {
        Self::InvalidArgument {
            value: value.into(),
            param: param.into(),
        }
    }

    pub fn missing_argument(param: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::MissingRequiredArgument {
            param: param.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn not_found(id: impl ToString) -> Self {
        Self::ObjectNotFound { id: id.to_string() }
    }

    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    ///
    /// Argument errors are reported as 500 rather than 400 to stay compatible
    /// with existing clients of the API.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidArgument { .. } => 500,
            ApiError::MissingRequiredArgument { .. } => 500,
            ApiError::ObjectNotFound { .. } => 404,
            ApiError::MalformedRequest { .. } => 400,
            ApiError::Repository(_) => 500,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}
