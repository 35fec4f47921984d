//! HTTP error taxonomy and response shaping.
//!
//! Three outcomes cover every failure: `Validation` (400, the request was
//! understood but rejected), `NotFound` (404, unknown id), and `Internal`
//! (500, generic message with the detail included only in development
//! mode). Error bodies carry `{success: false, message}` like every other
//! envelope.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Todo not found")]
    NotFound,

    /// The payload is the internal detail, surfaced only in development.
    #[error("Something went wrong!")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::EmptyText => ApiError::Validation(err.to_string()),
        }
    }
}

/// Malformed request bodies (bad JSON, wrong content type) fall under the
/// validation arm of the taxonomy.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let error = match &self {
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                config::dev_mode().then(|| detail.clone())
            }
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
            error,
        };
        (status, Json(body)).into_response()
    }
}
