//! Unified error type exposed by **`natural-core`**.
//!
//! Prediction services should convert their internal errors into one of these
//! variants before bubbling them up to the runtime entry point. Contract
//! violations found at compile time are *not* errors; they travel as
//! diagnostics instead.

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NaturalError>;

#[derive(Debug, Error)]
pub enum NaturalError {
    /// The call named neither a model nor a client default.
    #[error("no model selected for the natural function call and no default is configured")]
    UnresolvedModel,

    /// Failure while serialising or deserialising JSON payloads, including
    /// schema annotation payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic forwarding of any prediction-service error.
    #[error("prediction service returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid: {0}")]
    Invalid(String),
}
