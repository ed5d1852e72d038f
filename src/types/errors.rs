//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the relay.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed inbound request (maps to JSON-RPC invalid params).
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown inbound method (maps to JSON-RPC method not found).
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Connection-level failure reaching the remote endpoint. Retryable.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote endpoint answered with a server-error status. Retryable.
    #[error("request failed with status {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    /// All retry attempts exhausted; carries the last recorded error text.
    #[error("all retry attempts failed: {0}")]
    RetriesExhausted(String),

    /// Remote endpoint answered with a JSON-RPC error payload. Not retried.
    #[error("remote error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors (cache reads/writes, stdio).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convert to a JSON-RPC error code for inbound responses.
    pub fn to_rpc_error_code(&self) -> i64 {
        use crate::protocol::error_codes;
        match self {
            Error::Validation(_) => error_codes::INVALID_PARAMS,
            Error::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            Error::Serialization(_) => error_codes::PARSE_ERROR,
            Error::Rpc { code, .. } => *code,
            _ => error_codes::INTERNAL_ERROR,
        }
    }

    /// Whether the retrying client should attempt this call again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::RemoteStatus { .. })
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn method_not_found(msg: impl Into<String>) -> Self {
        Self::MethodNotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
