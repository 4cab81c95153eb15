//! Shared error type across admitgate crates.
//!
//! Decision functions are total and never produce these errors. They surface
//! from config loading and from the host guard pipeline only.

use serde::Deserialize;
use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientCode {
    /// Invalid input / malformed config.
    BadRequest,
    /// Credentials missing or rejected.
    Unauthenticated,
    /// Rate limited.
    RateLimited,
    /// Deliberately unavailable (chaos block).
    Unavailable,
    /// Request deadline exceeded.
    DeadlineExceeded,
    /// No handler for the operation.
    NotFound,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Unauthenticated => "UNAUTHENTICATED",
            ClientCode::RateLimited => "RATE_LIMITED",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AdmitError>;

/// Unified error type used by core and host.
#[derive(Debug, Error)]
pub enum AdmitError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("rejected ({}): {message}", code.as_str())]
    Rejected { code: ClientCode, message: String },
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AdmitError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            AdmitError::BadRequest(_) => ClientCode::BadRequest,
            AdmitError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            AdmitError::Rejected { code, .. } => *code,
            AdmitError::DeadlineExceeded => ClientCode::DeadlineExceeded,
            AdmitError::UnknownOperation(_) => ClientCode::NotFound,
            AdmitError::Internal(_) => ClientCode::Internal,
        }
    }
}
