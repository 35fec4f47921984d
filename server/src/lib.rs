//! HTTP API for the todo service.
//!
//! # Overview
//! In-memory todo list exposed as JSON under `/api`, with the uniform
//! `{success, data, message?, total?}` envelope on every endpoint except
//! `/api/health`. State lives in a single [`TodoStore`] shared across
//! handlers.
//!
//! # Design
//! - `store` owns the model and all mutation; handlers only translate.
//! - `app()` builds a router over an empty store, `app_seeded()` over the
//!   two starter items the production binary serves.
//! - CORS is permissive and requests are traced (tower-http layers).

pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod store;

use std::sync::Arc;

use axum::routing::{delete, get, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use store::{ListFilter, Stats, StoreError, Todo, TodoStore, UpdateTodo};

/// Router over an empty store.
pub fn app() -> Router {
    app_with_store(Arc::new(TodoStore::new()))
}

/// Router over the seeded store the production binary serves.
pub fn app_seeded() -> Router {
    app_with_store(Arc::new(TodoStore::seeded()))
}

pub fn app_with_store(store: Arc<TodoStore>) -> Router {
    // `/todos/reorder` and `/todos/completed/clear` are static paths, so
    // they win route resolution over `/todos/{id}`.
    let api = Router::new()
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route("/todos/reorder", put(handlers::reorder_todos))
        .route("/todos/completed/clear", delete(handlers::clear_completed))
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/stats", get(handlers::stats))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::unknown_route)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app_seeded()).await
}
