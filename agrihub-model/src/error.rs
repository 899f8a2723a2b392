//! Error types for the model layer.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while interpreting model data.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A domain name that does not map to any known domain.
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    /// A document that violates its ownership invariants.
    #[error("invalid document {id}: {reason}")]
    InvalidDocument { id: String, reason: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
