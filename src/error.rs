//! Error types for the Flax client.
//!
//! Failures are classified by the resource the failing call concerned, not by
//! HTTP status: the same 404 surfaces as [`FlaxError::Field`] from a schema
//! call and as [`FlaxError::Document`] from a search.

use std::fmt;

/// Message carried by every operation attempted on a deleted handle.
pub const DELETED_MESSAGE: &str = "database has been deleted";

/// Errors that can occur when talking to a Flax search service.
///
/// Each variant carries the diagnostic forwarded verbatim from the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlaxError {
    /// Database lifecycle failed: not found, creation conflict, or use of a
    /// deleted handle.
    #[error("database error: {0}")]
    Database(String),

    /// Schema management or commit failed.
    #[error("field error: {0}")]
    Field(String),

    /// Document CRUD or search failed.
    #[error("document error: {0}")]
    Document(String),
}

/// The resource category of a [`FlaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Database,
    Field,
    Document,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Field => write!(f, "field"),
            Self::Document => write!(f, "document"),
        }
    }
}

impl FlaxError {
    /// Build an error of the given category.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Database => Self::Database(message),
            ErrorKind::Field => Self::Field(message),
            ErrorKind::Document => Self::Document(message),
        }
    }

    pub(crate) fn deleted() -> Self {
        Self::Database(DELETED_MESSAGE.to_string())
    }

    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(_) => ErrorKind::Database,
            Self::Field(_) => ErrorKind::Field,
            Self::Document(_) => ErrorKind::Document,
        }
    }

    /// The forwarded diagnostic, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Database(m) | Self::Field(m) | Self::Document(m) => m,
        }
    }
}

/// Failures raised by a [`Transport`](crate::transport::Transport) before a
/// status code is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL or resource path could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Success body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for Results using [`FlaxError`].
pub type Result<T> = std::result::Result<T, FlaxError>;
