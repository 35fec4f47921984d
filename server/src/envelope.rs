//! Uniform success envelope for API responses.
//!
//! Every endpoint except `/api/health` wraps its payload as
//! `{success, data, message?, total?}`; absent fields are omitted from the
//! JSON entirely. Error responses are shaped in `error.rs`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            total: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            total: None,
        }
    }

    /// List responses also report how many items were returned.
    pub fn listing(data: T, total: usize) -> Self {
        Self {
            success: true,
            data,
            message: None,
            total: Some(total),
        }
    }
}
