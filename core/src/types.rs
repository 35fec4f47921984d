//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's wire schema but are defined
//! independently. Keeping the client's view of the schema separate from the
//! server's axum handlers means neither crate can quietly bend the contract;
//! the workspace integration tests catch any drift. All JSON keys are
//! camelCase to match the wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item returned by the API.
///
/// `updated_at` stays `None` until the first update and is omitted from
/// JSON while unset, so a freshly created item round-trips without it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a new todo. The server trims the text and
/// rejects it when the trimmed result is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Request payload for rewriting display order: ids listed in their new
/// positions. Ids unknown to the server are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTodos {
    pub todo_ids: Vec<Uuid>,
}

/// Aggregate counters reported by `/stats` and derived locally by the
/// controller with the same formula.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub completion_rate: u32,
}

impl Stats {
    /// Compute the counters for a set of items. `completion_rate` is a
    /// rounded percentage, 0 for an empty set.
    pub fn for_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Todo>,
    {
        let mut total = 0usize;
        let mut completed = 0usize;
        for item in items {
            total += 1;
            if item.completed {
                completed += 1;
            }
        }
        let completion_rate = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        Stats {
            total,
            active: total - completed,
            completed,
            completion_rate,
        }
    }
}

/// View selector over the completion flag. A pure predicate: filtering
/// never mutates state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// The query-string value for the list endpoint; `All` omits the
    /// parameter entirely, matching what browsers of this API send.
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            Filter::All => None,
            Filter::Active => Some("active"),
            Filter::Completed => Some("completed"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }
}

/// The uniform response wrapper used by every JSON endpoint. Absent fields
/// are omitted on the wire, so deserialization defaults them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

// `#[serde(default)]` alone requires `T: Default`; route through a helper
// so `Envelope<T>` deserializes for any `T`.
fn none<T>() -> Option<T> {
    None
}

/// Flat body of `/health` — the one endpoint that does not nest its payload
/// under `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}
