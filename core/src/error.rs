//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Validation` get dedicated variants because callers
//! handle them differently: "the resource does not exist" drives rollback
//! decisions and "the server rejected the input" carries a message worth
//! showing to the user. All other non-2xx responses land in `Http` with the
//! raw status code and the envelope's message (or body) for debugging.

use std::fmt;

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404 — the requested todo does not exist.
    NotFound,

    /// The server returned 400 — the request payload was rejected.
    Validation(String),

    /// The server returned a non-2xx status other than 400/404.
    Http { status: u16, message: String },

    /// The request never produced a response; the host reports the
    /// transport failure (connection refused, timeout) as a string.
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::Validation(msg) => write!(f, "request rejected: {msg}"),
            ApiError::Http { status, message } => {
                write!(f, "HTTP {status}: {message}")
            }
            ApiError::Transport(msg) => write!(f, "transport failed: {msg}"),
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
