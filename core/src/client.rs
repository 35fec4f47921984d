//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each API operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping this layer
//! deterministic and free of I/O dependencies.
//!
//! Every endpoint except `/health` wraps its payload in the
//! `{success, data, message, total}` envelope; the parse methods unwrap it
//! and, on failure statuses, prefer the envelope's `message` over the raw
//! body when classifying the error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateTodo, Envelope, Filter, HealthStatus, ReorderTodos, Stats, Todo, UpdateTodo,
};

/// Stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    /// `base_url` should include the API prefix, e.g.
    /// `http://127.0.0.1:5000/api`. A trailing slash is stripped.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self, filter: Filter) -> HttpRequest {
        let url = match filter.as_query() {
            Some(value) => format!("{}/todos?filter={value}", self.base_url),
            None => format!("{}/todos", self.base_url),
        };
        get(url)
    }

    pub fn build_get_todo(&self, id: Uuid) -> HttpRequest {
        get(format!("{}/todos/{id}", self.base_url))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, format!("{}/todos", self.base_url), input)
    }

    pub fn build_update_todo(&self, id: Uuid, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, format!("{}/todos/{id}", self.base_url), input)
    }

    pub fn build_delete_todo(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_clear_completed(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/todos/completed/clear", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_reorder_todos(&self, input: &ReorderTodos) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Put,
            format!("{}/todos/reorder", self.base_url),
            input,
        )
    }

    pub fn build_stats(&self) -> HttpRequest {
        get(format!("{}/stats", self.base_url))
    }

    pub fn build_health(&self) -> HttpRequest {
        get(format!("{}/health", self.base_url))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 200)
    }

    /// The API echoes the removed item back.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 200)
    }

    /// Returns the removed items; empty when nothing was completed.
    pub fn parse_clear_completed(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response, 200)
    }

    /// Returns the full list in its new order.
    pub fn parse_reorder_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response, 200)
    }

    pub fn parse_stats(&self, response: HttpResponse) -> Result<Stats, ApiError> {
        decode(response, 200)
    }

    /// `/health` responds with a flat body rather than the envelope.
    pub fn parse_health(&self, response: HttpResponse) -> Result<HealthStatus, ApiError> {
        if response.status != 200 {
            return Err(classify_failure(&response));
        }
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: Vec::new(),
        body: None,
    }
}

fn json_request<T: Serialize>(
    method: HttpMethod,
    url: String,
    input: &T,
) -> Result<HttpRequest, ApiError> {
    let body =
        serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Unwrap a success envelope, or classify the failure status.
fn decode<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    if response.status != expected {
        return Err(classify_failure(&response));
    }
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    envelope
        .data
        .ok_or_else(|| ApiError::DeserializationError("envelope carries no data".to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant,
/// pulling the human-readable message out of the error envelope when the
/// body contains one.
fn classify_failure(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(&response.body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| response.body.clone());
    match response.status {
        404 => ApiError::NotFound,
        400 => ApiError::Validation(message),
        status => ApiError::Http { status, message },
    }
}
