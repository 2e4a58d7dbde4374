//! Error types for lsq.

use std::time::Duration;

use thiserror::Error;

/// Top-level result type for lsq operations.
pub type Result<T> = std::result::Result<T, LsqError>;

/// Top-level error type for lsq.
#[derive(Debug, Error)]
pub enum LsqError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LsqError {
    pub fn page_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "page",
            key: name.into(),
        }
    }

    pub fn block_not_found(uuid: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "block",
            key: uuid.into(),
        }
    }

    pub fn journal_not_found(date: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "journal page",
            key: date.into(),
        }
    }
}

/// Input rejected before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Missing field, unknown field, or wrong JSON type.
    #[error("invalid parameters: {0}")]
    Shape(String),

    #[error("invalid parameter '{field}': must not be empty")]
    Empty { field: &'static str },

    #[error("invalid parameter '{field}': must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
        value: u64,
    },

    #[error("invalid parameter '{field}': '{value}' is not a valid block UUID")]
    InvalidUuid { field: &'static str, value: String },

    #[error("invalid parameter '{field}': '{value}' is not a calendar date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid parameter '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure of a single remote procedure call. Never retried.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request to Logseq timed out after {after:?} (method {method})")]
    Timeout { method: String, after: Duration },

    #[error("Logseq returned HTTP {status} for {method}: {message}")]
    Status {
        method: String,
        status: u16,
        message: String,
    },

    #[error("Logseq reported an error for {method}: {message}")]
    Remote { method: String, message: String },

    #[error("malformed reply from Logseq for {method}: {message}")]
    Decode { method: String, message: String },

    #[error("could not reach Logseq for {method}: {message}")]
    Transport { method: String, message: String },
}
