//! Typed error handling for the mediplus client
//!
//! Every gateway failure is converted into an [`ApiError`] and caught at the
//! store boundary, where it becomes the store's `error` message. Nothing is
//! retried automatically and no failure escalates beyond the store that
//! issued the operation.
//!
//! # Error taxonomy
//!
//! - client-side guard errors: [`ApiError::MissingToken`],
//!   [`ApiError::Unsupported`], [`ApiError::Validation`]
//! - remote errors: [`ApiError::Remote`] (message passed through from the
//!   response body), [`ApiError::NotFound`], [`ApiError::InvalidCredentials`]
//! - generic failures: [`ApiError::Transport`], [`ApiError::Decode`]
//! - local plumbing: [`ApiError::Config`], [`ApiError::Persistence`]

use crate::core::resource::Operation;
use thiserror::Error;

/// The error type for all client operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// A protected operation was attempted with no persisted session token.
    /// Raised before any network request is issued.
    #[error("no authentication token found")]
    MissingToken,

    /// The remote API exposes no endpoint for this operation on this entity
    #[error("{entity} does not support {operation}")]
    Unsupported {
        entity: &'static str,
        operation: Operation,
    },

    /// A draft payload failed client-side validation
    #[error("validation failed: {0}")]
    Validation(String),

    /// Business or validation error reported by the remote API; the message
    /// is taken verbatim from the response body
    #[error("{0}")]
    Remote(String),

    /// The remote API answered 404 for the requested record
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Login was rejected by the remote API
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The response body could not be decoded into the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// Network-level failure (connection, TLS, DNS, ...)
    #[error("request failed: {0}")]
    Transport(String),

    /// Configuration could not be loaded or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// The persisted session file could not be read or written
    #[error("session persistence error: {0}")]
    Persistence(String),
}

impl ApiError {
    /// The user-facing message recorded in a store's `error` field
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether this error was raised before any request left the client
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            ApiError::MissingToken | ApiError::Unsupported { .. } | ApiError::Validation(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<serde_yaml::Error> for ApiError {
    fn from(err: serde_yaml::Error) -> Self {
        ApiError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// A specialized Result type for client operations
pub type ApiResult<T> = Result<T, ApiError>;
