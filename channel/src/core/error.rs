//! # Common Error Types
//!
//! Consolidated error handling for the AI Channel client.
//!
//! Two layers:
//!
//! - [`ApiError`]: what the REST wrapper reports (HTTP status + payload,
//!   transport failure, undecodable body).
//! - [`AppError`]: everything the bridges and pages can fail with.
//!
//! Pages never show structured codes; they render `to_string()` of either
//! type as a single human-readable message.
//!
//! ## Usage Pattern
//!
//! ```rust,no_run
//! use channel::core::error::AppError;
//!
//! fn require(value: &str) -> Result<&str, AppError> {
//!     if value.is_empty() {
//!         return Err(AppError::Validation("Value is required".to_string()));
//!     }
//!     Ok(value)
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

/// Failure of a single REST call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    ///
    /// `message` is the backend's `error`/`message` field when present, else
    /// the raw body, else the status reason. `payload` is the JSON body when
    /// it parsed.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// The request never produced a response (DNS, refused, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend REST call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Media room could not be joined or driven
    #[error("Room error: {0}")]
    Room(String),

    /// Agent socket could not be opened or written
    #[error("Agent error: {0}")]
    Agent(String),

    /// User input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not valid in the current state (e.g. no logged-in user)
    #[error("State error: {0}")]
    State(String),

    /// Missing or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file persistence failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted or wire JSON document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
