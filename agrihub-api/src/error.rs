//! Error types for API access.

use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the server, or no response could be read.
    #[error("network error: {0}")]
    Transport(String),

    /// Non-2xx response.
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    /// 2xx response whose body carried `"success": false`.
    #[error("{message}")]
    Rejected { message: String },

    /// Input refused before any request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token storage could not be read or written.
    #[error("token storage error: {0}")]
    Storage(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The operation needs a bearer token and none is stored.
    #[error("authentication required")]
    AuthRequired,
}

impl ApiError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the error was raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    /// Returns true if the server was never reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Returns true for missing or rejected credentials.
    pub fn is_auth(&self) -> bool {
        match self {
            ApiError::AuthRequired => true,
            ApiError::Http { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Message suitable for a toast: the server's own text where there is one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } | ApiError::Rejected { message } => message.clone(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Transport(_) => "Network error, please check your connection".to_string(),
            ApiError::AuthRequired => "Please sign in to continue".to_string(),
            other => other.to_string(),
        }
    }
}
