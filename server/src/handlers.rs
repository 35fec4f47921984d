//! Request handlers: parse and validate input, call the store, envelope
//! the output.
//!
//! Handlers own the wire-facing payload shapes and the quirks of the
//! validation messages; everything stateful lives in `store`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::store::{ListFilter, TodoStore, UpdateTodo};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    filter: Option<String>,
}

/// `text` stays optional at the wire so a missing field reports
/// "Todo text is required" instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    text: Option<String>,
}

/// `todoIds` is taken as a raw JSON value so a missing or non-array
/// payload reports "todoIds must be an array", and entries that are not
/// UUID strings are skipped while still consuming their position.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTodos {
    #[serde(default)]
    todo_ids: Option<Value>,
}

pub async fn list_todos(
    State(store): State<Arc<TodoStore>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let filter = ListFilter::from_param(query.filter.as_deref());
    let items = store.list(filter).await;
    let total = items.len();
    Json(Envelope::listing(items, total))
}

pub async fn get_todo(
    State(store): State<Arc<TodoStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = store.get(parse_id(&id)?).await?;
    Ok(Json(Envelope::data(todo)))
}

pub async fn create_todo(
    State(store): State<Arc<TodoStore>>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let todo = store.create(&input.text.unwrap_or_default()).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(todo, "Todo created successfully")),
    ))
}

pub async fn update_todo(
    State(store): State<Arc<TodoStore>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    let todo = store.update(id, input).await?;
    Ok(Json(Envelope::with_message(
        todo,
        "Todo updated successfully",
    )))
}

pub async fn delete_todo(
    State(store): State<Arc<TodoStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = store.delete(parse_id(&id)?).await?;
    Ok(Json(Envelope::with_message(
        todo,
        "Todo deleted successfully",
    )))
}

pub async fn clear_completed(State(store): State<Arc<TodoStore>>) -> impl IntoResponse {
    let removed = store.clear_completed().await;
    let message = format!("{} completed todos cleared", removed.len());
    Json(Envelope::with_message(removed, message))
}

pub async fn reorder_todos(
    State(store): State<Arc<TodoStore>>,
    payload: Result<Json<ReorderTodos>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let Some(Value::Array(entries)) = input.todo_ids else {
        return Err(ApiError::Validation("todoIds must be an array".to_string()));
    };
    let ids: Vec<Option<Uuid>> = entries
        .iter()
        .map(|entry| entry.as_str().and_then(|raw| Uuid::parse_str(raw).ok()))
        .collect();
    let items = store.reorder(&ids).await;
    Ok(Json(Envelope::with_message(
        items,
        "Todos reordered successfully",
    )))
}

pub async fn stats(State(store): State<Arc<TodoStore>>) -> impl IntoResponse {
    Json(Envelope::data(store.stats().await))
}

/// `/api/health` is the one flat (non-envelope) body.
#[derive(Debug, Serialize)]
pub struct Health {
    success: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        success: true,
        message: "Todo API is running!",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Router fallback for paths outside the API surface.
pub async fn unknown_route() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": "API endpoint not found"
        })),
    )
}

/// A path segment that is not a UUID cannot name any item.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}
