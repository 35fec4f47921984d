//! In-memory item store: the single source of truth for todo state.
//!
//! # Design
//! A `Vec` guarded by a `tokio::sync::RwLock` is canonical state. A map
//! would make id lookup cheaper, but relative position matters here:
//! `order` values are not unique and ties are resolved by stable sort, so
//! the collection has to remember which item came first. Every operation
//! takes the lock for its full critical section, so concurrent requests
//! serialize cleanly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    /// Absent until the first update, then stamped on every update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl ListFilter {
    /// Query-parameter form; anything unrecognized behaves as `All`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("active") => ListFilter::Active,
            Some("completed") => ListFilter::Completed,
            _ => ListFilter::All,
        }
    }

    fn matches(self, todo: &Todo) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Active => !todo.completed,
            ListFilter::Completed => todo.completed,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// `round(completed / total * 100)`, 0 for an empty store.
    pub completion_rate: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Todo text is required")]
    EmptyText,
    #[error("Todo not found")]
    NotFound,
}

/// Shared, lock-guarded todo collection.
#[derive(Debug, Default)]
pub struct TodoStore {
    items: RwLock<Vec<Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with two starter items, the state the service
    /// boots with in production.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let starter = |text: &str, order: i64| Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            order,
            created_at: now,
            updated_at: None,
        };
        Self {
            items: RwLock::new(vec![
                starter("Welcome to your todo list", 0),
                starter("Build an awesome todo app", 1),
            ]),
        }
    }

    /// Items matching `filter`, ascending by `order` (stable on ties).
    pub async fn list(&self, filter: ListFilter) -> Vec<Todo> {
        let items = self.items.read().await;
        let mut selected: Vec<Todo> = items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        selected.sort_by_key(|item| item.order);
        selected
    }

    pub async fn get(&self, id: Uuid) -> Result<Todo, StoreError> {
        let items = self.items.read().await;
        items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// New item with a fresh id and `order = max(existing) + 1` (0 when the
    /// store is empty). Rejects text that trims to nothing.
    pub async fn create(&self, text: &str) -> Result<Todo, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        let mut items = self.items.write().await;
        let order = items.iter().map(|item| item.order).max().map_or(0, |max| max + 1);
        let todo = Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            order,
            created_at: Utc::now(),
            updated_at: None,
        };
        items.push(todo.clone());
        Ok(todo)
    }

    /// Applies the present fields (text is trimmed) and stamps `updatedAt`,
    /// even for an empty update.
    pub async fn update(&self, id: Uuid, update: UpdateTodo) -> Result<Todo, StoreError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(text) = update.text {
            item.text = text.trim().to_string();
        }
        if let Some(completed) = update.completed {
            item.completed = completed;
        }
        item.updated_at = Some(Utc::now());
        Ok(item.clone())
    }

    /// Removes and returns the item.
    pub async fn delete(&self, id: Uuid) -> Result<Todo, StoreError> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound)?;
        Ok(items.remove(index))
    }

    /// Removes every completed item and returns them; a no-op when none
    /// are completed.
    pub async fn clear_completed(&self) -> Vec<Todo> {
        let mut items = self.items.write().await;
        let removed: Vec<Todo> = items.iter().filter(|item| item.completed).cloned().collect();
        items.retain(|item| !item.completed);
        removed
    }

    /// Rewrites `order` from each id's position in the sequence. `None`
    /// entries (ids that were not valid at the HTTP layer) and ids that
    /// match no item still consume their position; items absent from the
    /// sequence keep their previous `order`, with collisions resolved by
    /// the stable sort. Returns the full sorted list.
    pub async fn reorder(&self, ids: &[Option<Uuid>]) -> Vec<Todo> {
        let mut items = self.items.write().await;
        for (position, id) in ids.iter().enumerate() {
            let Some(id) = id else { continue };
            if let Some(item) = items.iter_mut().find(|item| item.id == *id) {
                item.order = position as i64;
            }
        }
        items.sort_by_key(|item| item.order);
        items.clone()
    }

    pub async fn stats(&self) -> Stats {
        let items = self.items.read().await;
        let total = items.len();
        let completed = items.iter().filter(|item| item.completed).count();
        let active = total - completed;
        let completion_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        Stats {
            total,
            active,
            completed,
            completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_camel_case_keys() {
        let todo = Todo {
            id: Uuid::nil(),
            text: "Test".to_string(),
            completed: false,
            order: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["text"], "Test");
        assert!(json.get("createdAt").is_some());
        // updatedAt is omitted entirely while unset.
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn filter_param_parses_known_values_and_defaults_to_all() {
        assert_eq!(ListFilter::from_param(Some("active")), ListFilter::Active);
        assert_eq!(
            ListFilter::from_param(Some("completed")),
            ListFilter::Completed
        );
        assert_eq!(ListFilter::from_param(Some("bogus")), ListFilter::All);
        assert_eq!(ListFilter::from_param(None), ListFilter::All);
    }

    #[tokio::test]
    async fn create_assigns_incrementing_order() {
        let store = TodoStore::new();
        let first = store.create("first").await.unwrap();
        assert_eq!(first.order, 0);
        let second = store.create("second").await.unwrap();
        assert_eq!(second.order, 1);

        // Orders keep climbing from the max, not from the count.
        store.delete(first.id).await.unwrap();
        let third = store.create("third").await.unwrap();
        assert_eq!(third.order, 2);
    }

    #[tokio::test]
    async fn create_rejects_blank_text_and_adds_nothing() {
        let store = TodoStore::new();
        assert_eq!(store.create("").await.unwrap_err(), StoreError::EmptyText);
        assert_eq!(store.create("   ").await.unwrap_err(), StoreError::EmptyText);
        assert!(store.list(ListFilter::All).await.is_empty());
    }

    #[tokio::test]
    async fn create_trims_text() {
        let store = TodoStore::new();
        let todo = store.create("  padded  ").await.unwrap();
        assert_eq!(todo.text, "padded");
        assert!(!todo.completed);
        assert!(todo.updated_at.is_none());
    }

    #[tokio::test]
    async fn list_filters_by_completion_and_sorts_by_order() {
        let store = TodoStore::new();
        let a = store.create("a").await.unwrap();
        let b = store.create("b").await.unwrap();
        store.create("c").await.unwrap();
        store
            .update(
                b.id,
                UpdateTodo {
                    text: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap();

        let all = store.list(ListFilter::All).await;
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|pair| pair[0].order <= pair[1].order));

        let active = store.list(ListFilter::Active).await;
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|item| !item.completed));
        assert_eq!(active[0].id, a.id);

        let completed = store.list(ListFilter::Completed).await;
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, b.id);
    }

    #[tokio::test]
    async fn get_round_trips_created_item() {
        let store = TodoStore::new();
        let created = store.create("fetch me").await.unwrap();
        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.updated_at.is_none());
    }

    #[tokio::test]
    async fn update_applies_partial_fields_and_stamps_updated_at() {
        let store = TodoStore::new();
        let created = store.create("original").await.unwrap();

        let updated = store
            .update(
                created.id,
                UpdateTodo {
                    text: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "original");
        assert!(updated.completed);
        assert!(updated.updated_at.is_some());

        let updated = store
            .update(
                created.id,
                UpdateTodo {
                    text: Some("  renamed  ".to_string()),
                    completed: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "renamed");
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn update_unknown_id_leaves_store_unchanged() {
        let store = TodoStore::new();
        store.create("only").await.unwrap();
        let err = store
            .update(Uuid::new_v4(), UpdateTodo::default())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);

        let items = store.list(ListFilter::All).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].updated_at.is_none());
    }

    #[tokio::test]
    async fn delete_returns_item_and_fails_the_second_time() {
        let store = TodoStore::new();
        let created = store.create("doomed").await.unwrap();
        let removed = store.delete(created.id).await.unwrap();
        assert_eq!(removed, created);
        assert_eq!(
            store.delete(created.id).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn clear_completed_removes_all_and_only_completed() {
        let store = TodoStore::new();
        store.create("keep").await.unwrap();
        let done = store.create("done").await.unwrap();
        store
            .update(
                done.id,
                UpdateTodo {
                    text: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap();

        let removed = store.clear_completed().await;
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, done.id);

        let remaining = store.list(ListFilter::All).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "keep");

        // Idempotent when nothing is completed.
        assert!(store.clear_completed().await.is_empty());
        assert_eq!(store.list(ListFilter::All).await.len(), 1);
    }

    #[tokio::test]
    async fn reorder_full_reversal_reverses_the_list() {
        let store = TodoStore::new();
        let a = store.create("a").await.unwrap();
        let b = store.create("b").await.unwrap();
        let c = store.create("c").await.unwrap();

        let ids = vec![Some(c.id), Some(b.id), Some(a.id)];
        let reordered = store.reorder(&ids).await;
        let texts: Vec<&str> = reordered.iter().map(|item| item.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "b", "a"]);

        let listed = store.list(ListFilter::All).await;
        assert_eq!(listed, reordered);
    }

    #[tokio::test]
    async fn reorder_unknown_entries_consume_positions() {
        let store = TodoStore::new();
        let a = store.create("a").await.unwrap();
        let b = store.create("b").await.unwrap();

        // Position 0 is burned on an id that matches nothing.
        let ids = vec![None, Some(b.id), Some(a.id)];
        let reordered = store.reorder(&ids).await;
        assert_eq!(reordered[0].id, b.id);
        assert_eq!(reordered[0].order, 1);
        assert_eq!(reordered[1].id, a.id);
        assert_eq!(reordered[1].order, 2);
    }

    #[tokio::test]
    async fn reorder_keeps_unlisted_items_with_stable_ties() {
        let store = TodoStore::new();
        let a = store.create("a").await.unwrap();
        let b = store.create("b").await.unwrap();

        // b takes order 0, colliding with a's untouched order 0; the
        // stable sort leaves a (earlier in the collection) first.
        let ids = vec![Some(b.id)];
        let reordered = store.reorder(&ids).await;
        assert_eq!(reordered[0].id, a.id);
        assert_eq!(reordered[0].order, 0);
        assert_eq!(reordered[1].id, b.id);
        assert_eq!(reordered[1].order, 0);
    }

    #[tokio::test]
    async fn stats_round_the_completion_rate() {
        let store = TodoStore::new();
        assert_eq!(
            store.stats().await,
            Stats {
                total: 0,
                active: 0,
                completed: 0,
                completion_rate: 0
            }
        );

        store.create("a").await.unwrap();
        store.create("b").await.unwrap();
        let c = store.create("c").await.unwrap();
        store
            .update(
                c.id,
                UpdateTodo {
                    text: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completion_rate, 33);
    }

    #[tokio::test]
    async fn seeded_store_has_two_active_starter_items() {
        let store = TodoStore::seeded();
        let items = store.list(ListFilter::All).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].order, 0);
        assert_eq!(items[1].order, 1);
        assert!(items.iter().all(|item| !item.completed));
    }
}
