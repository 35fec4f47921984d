//! Client-side state machine with optimistic mutation and rollback.
//!
//! # Design
//! `TodoController` owns the client's copy of the list and follows the same
//! host-does-IO pattern as `TodoClient`: intent methods apply the optimistic
//! mutation immediately and return a [`Command`] carrying the sequence
//! number, the rollback snapshot, and the `HttpRequest` to execute. The host
//! performs the round-trip and feeds the outcome back through
//! [`TodoController::complete`], which confirms (adopting server data) or
//! reverts deterministically. A failed clear or reorder cannot be reverted
//! from a snapshot, so `complete` hands back a [`Recovery::Reload`] command
//! the host must execute to resync.
//!
//! Responses can arrive out of intent order. Every intent gets a sequence
//! number; a per-item ownership map discards confirms and reverts for items
//! a newer intent has since touched, and a whole-list adoption is discarded
//! once any newer mutation has been applied. Reloads are deliberate resyncs
//! and adopt unconditionally.

use std::collections::HashMap;

use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Filter, ReorderTodos, Stats, Todo, UpdateTodo};

/// Lifecycle of the controller's view of the list.
///
/// `Failed` only ever results from a failed *initial* load; once a load has
/// succeeded the controller stays `Ready` and reload failures surface as
/// notices instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed(String),
}

/// Severity of a transient user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Transient message for the host to display and expire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// An intent in flight: the request to execute plus everything needed to
/// confirm or revert it. Pass it back to [`TodoController::complete`] with
/// the outcome of the round-trip.
#[derive(Debug)]
pub struct Command {
    seq: u64,
    kind: CommandKind,
    pub request: HttpRequest,
}

impl Command {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
enum CommandKind {
    Load,
    Health,
    Add,
    Toggle { previous: Todo },
    Delete { previous: Todo },
    Clear { count: usize },
    Reorder,
}

/// Follow-up the host must perform after a completion.
#[must_use = "a Reload recovery carries a command the host must execute"]
#[derive(Debug)]
pub enum Recovery {
    None,
    /// The optimistic state could not be reverted locally; execute this
    /// reload to resync from the server.
    Reload(Command),
}

/// Client state controller: list copy, filter, in-flight guards, notices.
#[derive(Debug)]
pub struct TodoController {
    client: TodoClient,
    items: Vec<Todo>,
    filter: Filter,
    phase: Phase,
    notices: Vec<Notice>,
    adding: bool,
    clearing: bool,
    loaded_once: bool,
    seq: u64,
    last_mutation_seq: u64,
    item_owners: HashMap<Uuid, u64>,
}

impl TodoController {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: TodoClient::new(base_url),
            items: Vec::new(),
            filter: Filter::All,
            phase: Phase::Loading,
            notices: Vec::new(),
            adding: false,
            clearing: false,
            loaded_once: false,
            seq: 0,
            last_mutation_seq: 0,
            item_owners: HashMap::new(),
        }
    }

    // --- read views ---

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// Items matching the active filter, in display order.
    pub fn visible_items(&self) -> Vec<&Todo> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .collect()
    }

    /// Aggregates derived from the local copy, same formula as the server.
    pub fn stats(&self) -> Stats {
        Stats::for_items(&self.items)
    }

    /// True while an add request is in flight; duplicate adds are refused.
    pub fn is_adding(&self) -> bool {
        self.adding
    }

    /// True while a clear-completed request is in flight.
    pub fn is_clearing(&self) -> bool {
        self.clearing
    }

    /// Drain pending notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- intents ---

    /// Fetch the full list. The first load (and a retry after a failed
    /// first load) blocks the UI in `Loading`; once `Ready`, reloads run
    /// in place and adopt unconditionally on success.
    pub fn load(&mut self) -> Command {
        if !self.loaded_once {
            self.phase = Phase::Loading;
        }
        Command {
            seq: self.next_seq(),
            kind: CommandKind::Load,
            request: self.client.build_list_todos(Filter::All),
        }
    }

    /// Best-effort connectivity probe; failure only warns.
    pub fn health_check(&mut self) -> Command {
        Command {
            seq: self.next_seq(),
            kind: CommandKind::Health,
            request: self.client.build_health(),
        }
    }

    /// Submit a new item. Not optimistic: the item appears only once the
    /// server has assigned id and order. Refused (`None`) while another add
    /// is in flight or when the trimmed text is empty.
    pub fn add(&mut self, text: &str) -> Option<Command> {
        let text = text.trim();
        if text.is_empty() || self.adding {
            return None;
        }
        let input = CreateTodo {
            text: text.to_string(),
        };
        let request = match self.client.build_create_todo(&input) {
            Ok(request) => request,
            Err(err) => {
                self.push_notice(NoticeLevel::Error, err.to_string());
                return None;
            }
        };
        self.adding = true;
        Some(Command {
            seq: self.next_seq(),
            kind: CommandKind::Add,
            request,
        })
    }

    /// Optimistically flip completion; `None` if the id is not present.
    pub fn toggle(&mut self, id: Uuid) -> Option<Command> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let desired = !self.items[index].completed;
        let input = UpdateTodo {
            text: None,
            completed: Some(desired),
        };
        let request = match self.client.build_update_todo(id, &input) {
            Ok(request) => request,
            Err(err) => {
                self.push_notice(NoticeLevel::Error, err.to_string());
                return None;
            }
        };
        let previous = self.items[index].clone();
        self.items[index].completed = desired;
        let seq = self.next_seq();
        self.item_owners.insert(id, seq);
        self.last_mutation_seq = seq;
        Some(Command {
            seq,
            kind: CommandKind::Toggle { previous },
            request,
        })
    }

    /// Optimistically remove; the snapshot is reinserted on failure.
    pub fn delete(&mut self, id: Uuid) -> Option<Command> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let request = self.client.build_delete_todo(id);
        let previous = self.items.remove(index);
        let seq = self.next_seq();
        self.item_owners.insert(id, seq);
        self.last_mutation_seq = seq;
        Some(Command {
            seq,
            kind: CommandKind::Delete { previous },
            request,
        })
    }

    /// Optimistically drop all completed items. Refused (`None`) while a
    /// clear is in flight or when nothing is completed.
    pub fn clear_completed(&mut self) -> Option<Command> {
        if self.clearing {
            return None;
        }
        let count = self.items.iter().filter(|item| item.completed).count();
        if count == 0 {
            return None;
        }
        let request = self.client.build_clear_completed();
        self.items.retain(|item| !item.completed);
        self.clearing = true;
        let seq = self.next_seq();
        self.last_mutation_seq = seq;
        Some(Command {
            seq,
            kind: CommandKind::Clear { count },
            request,
        })
    }

    /// Optimistically rewrite `order` from the position of each id in the
    /// sequence (unknown ids still consume their position, mirroring the
    /// server) and re-sort.
    pub fn reorder(&mut self, ids: &[Uuid]) -> Option<Command> {
        let input = ReorderTodos {
            todo_ids: ids.to_vec(),
        };
        let request = match self.client.build_reorder_todos(&input) {
            Ok(request) => request,
            Err(err) => {
                self.push_notice(NoticeLevel::Error, err.to_string());
                return None;
            }
        };
        for (position, id) in ids.iter().enumerate() {
            if let Some(item) = self.items.iter_mut().find(|item| item.id == *id) {
                item.order = position as i64;
            }
        }
        sort_by_order(&mut self.items);
        let seq = self.next_seq();
        self.last_mutation_seq = seq;
        Some(Command {
            seq,
            kind: CommandKind::Reorder,
            request,
        })
    }

    // --- completion ---

    /// Feed back the outcome of a command's round-trip. Transport failures
    /// (no response at all) are reported as the error string. The returned
    /// [`Recovery`] must be honored: `Reload` carries the resync command
    /// for a clear or reorder whose optimistic state is now unknown.
    pub fn complete(
        &mut self,
        command: Command,
        outcome: Result<HttpResponse, String>,
    ) -> Recovery {
        let Command { seq, kind, .. } = command;
        match kind {
            CommandKind::Load => self.complete_load(seq, outcome),
            CommandKind::Health => self.complete_health(outcome),
            CommandKind::Add => self.complete_add(seq, outcome),
            CommandKind::Toggle { previous } => self.complete_toggle(seq, previous, outcome),
            CommandKind::Delete { previous } => self.complete_delete(seq, previous, outcome),
            CommandKind::Clear { count } => self.complete_clear(count, outcome),
            CommandKind::Reorder => self.complete_reorder(seq, outcome),
        }
    }

    fn complete_load(&mut self, seq: u64, outcome: Result<HttpResponse, String>) -> Recovery {
        let parsed = match outcome {
            Ok(response) => self.client.parse_list_todos(response),
            Err(message) => Err(ApiError::Transport(message)),
        };
        match parsed {
            Ok(mut items) => {
                sort_by_order(&mut items);
                self.items = items;
                self.item_owners.clear();
                self.last_mutation_seq = seq;
                self.loaded_once = true;
                self.phase = Phase::Ready;
            }
            Err(_) => {
                self.push_notice(NoticeLevel::Error, "Failed to load todos");
                if !self.loaded_once {
                    self.phase = Phase::Failed(
                        "Failed to load todos. Please check if the server is running.".to_string(),
                    );
                }
            }
        }
        Recovery::None
    }

    fn complete_health(&mut self, outcome: Result<HttpResponse, String>) -> Recovery {
        let parsed = match outcome {
            Ok(response) => self.client.parse_health(response),
            Err(message) => Err(ApiError::Transport(message)),
        };
        if parsed.is_err() {
            self.push_notice(
                NoticeLevel::Warning,
                "Unable to connect to server. Some features may not work.",
            );
        }
        Recovery::None
    }

    fn complete_add(&mut self, seq: u64, outcome: Result<HttpResponse, String>) -> Recovery {
        self.adding = false;
        let parsed = match outcome {
            Ok(response) => self.client.parse_create_todo(response),
            Err(message) => Err(ApiError::Transport(message)),
        };
        match parsed {
            Ok(item) => {
                self.items.push(item);
                sort_by_order(&mut self.items);
                self.last_mutation_seq = self.last_mutation_seq.max(seq);
                self.push_notice(NoticeLevel::Success, "Todo added successfully!");
            }
            Err(_) => self.push_notice(NoticeLevel::Error, "Failed to add todo"),
        }
        Recovery::None
    }

    fn complete_toggle(
        &mut self,
        seq: u64,
        previous: Todo,
        outcome: Result<HttpResponse, String>,
    ) -> Recovery {
        let id = previous.id;
        let fresh = self.item_owners.get(&id) == Some(&seq);
        let parsed = match outcome {
            Ok(response) => self.client.parse_update_todo(response),
            Err(message) => Err(ApiError::Transport(message)),
        };
        match parsed {
            // A stale confirm would clobber a newer intent's state.
            Ok(item) if fresh => {
                let now_completed = item.completed;
                self.replace_item(item);
                self.last_mutation_seq = self.last_mutation_seq.max(seq);
                let message = if now_completed {
                    "Todo completed!"
                } else {
                    "Todo marked as active"
                };
                self.push_notice(NoticeLevel::Success, message);
            }
            Ok(_) => {}
            Err(_) => {
                if fresh {
                    self.replace_item(previous);
                    self.last_mutation_seq = self.last_mutation_seq.max(seq);
                }
                self.push_notice(NoticeLevel::Error, "Failed to update todo");
            }
        }
        self.release_owner(id, seq);
        Recovery::None
    }

    fn complete_delete(
        &mut self,
        seq: u64,
        previous: Todo,
        outcome: Result<HttpResponse, String>,
    ) -> Recovery {
        let id = previous.id;
        let fresh = self.item_owners.get(&id) == Some(&seq);
        let parsed = match outcome {
            Ok(response) => self.client.parse_delete_todo(response),
            Err(message) => Err(ApiError::Transport(message)),
        };
        match parsed {
            Ok(_) if fresh => self.push_notice(NoticeLevel::Success, "Todo deleted"),
            Ok(_) => {}
            Err(_) => {
                if fresh {
                    self.items.push(previous);
                    sort_by_order(&mut self.items);
                    self.last_mutation_seq = self.last_mutation_seq.max(seq);
                }
                self.push_notice(NoticeLevel::Error, "Failed to delete todo");
            }
        }
        self.release_owner(id, seq);
        Recovery::None
    }

    fn complete_clear(&mut self, count: usize, outcome: Result<HttpResponse, String>) -> Recovery {
        self.clearing = false;
        let parsed = match outcome {
            Ok(response) => self.client.parse_clear_completed(response),
            Err(message) => Err(ApiError::Transport(message)),
        };
        match parsed {
            Ok(_) => {
                self.push_notice(
                    NoticeLevel::Success,
                    format!("{count} completed todos cleared!"),
                );
                Recovery::None
            }
            Err(_) => {
                self.push_notice(NoticeLevel::Error, "Failed to clear completed todos");
                Recovery::Reload(self.load())
            }
        }
    }

    fn complete_reorder(&mut self, seq: u64, outcome: Result<HttpResponse, String>) -> Recovery {
        let parsed = match outcome {
            Ok(response) => self.client.parse_reorder_todos(response),
            Err(message) => Err(ApiError::Transport(message)),
        };
        match parsed {
            Ok(mut items) => {
                // Adopt the server's list only if nothing newer has mutated
                // local state since this reorder was applied.
                if self.last_mutation_seq <= seq {
                    sort_by_order(&mut items);
                    self.items = items;
                }
                Recovery::None
            }
            Err(_) => {
                self.push_notice(NoticeLevel::Error, "Failed to reorder todos");
                Recovery::Reload(self.load())
            }
        }
    }

    // --- internals ---

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Replace by id, re-sorting in case the incoming copy moved. Absent
    /// ids are a no-op: never resurrect an item deleted in the meantime.
    fn replace_item(&mut self, item: Todo) {
        if let Some(slot) = self.items.iter_mut().find(|slot| slot.id == item.id) {
            *slot = item;
            sort_by_order(&mut self.items);
        }
    }

    fn release_owner(&mut self, id: Uuid, seq: u64) {
        if self.item_owners.get(&id) == Some(&seq) {
            self.item_owners.remove(&id);
        }
    }
}

/// Stable, so equal `order` values keep their previous relative position.
fn sort_by_order(items: &mut [Todo]) {
    items.sort_by_key(|item| item.order);
}
