//! Interactive state for the terminal client.
//!
//! # Design
//! `App` is a thin host around [`TodoController`]: key handling turns
//! terminal input into controller commands, each command's HTTP round-trip
//! runs on a spawned task, and completions come back over an mpsc channel
//! into [`App::finish`]. All list, filter, and notice semantics live in the
//! controller; the app only owns terminal concerns (focus, selection, move
//! mode, toast expiry).

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use todo_core::{Command, Filter, HttpResponse, NoticeLevel, Phase, Recovery, TodoController};
use tokio::sync::mpsc;
use tokio::time::interval;
use uuid::Uuid;

use crate::net;
use crate::ui;

/// Matches the input length limit the web form enforced.
const INPUT_LIMIT: usize = 200;
const TOAST_TTL: Duration = Duration::from_secs(3);
const TICK: Duration = Duration::from_millis(120);

type Completion = (Command, Result<HttpResponse, String>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

/// A notice with an expiry, shown at the bottom of the screen.
#[derive(Debug)]
pub struct Toast {
    pub level: NoticeLevel,
    pub message: String,
    expires: Instant,
}

pub struct App {
    controller: TodoController,
    http: reqwest::Client,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    focus: Focus,
    input: String,
    selected: usize,
    move_mode: bool,
    toasts: Vec<Toast>,
    started: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(base_url: &str) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            controller: TodoController::new(base_url),
            http: reqwest::Client::new(),
            completions_tx,
            completions_rx,
            focus: Focus::Input,
            input: String::new(),
            selected: 0,
            move_mode: false,
            toasts: Vec::new(),
            started: Instant::now(),
            should_quit: false,
        }
    }

    // --- read views for the ui ---

    pub fn controller(&self) -> &TodoController {
        &self.controller
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_moving(&self) -> bool {
        self.move_mode
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Seconds since startup, drives the spinner animation.
    pub fn animation_elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    // --- intents ---

    /// Commands to dispatch before the first frame: initial load plus the
    /// connectivity probe.
    pub fn startup(&mut self) -> Vec<Command> {
        vec![self.controller.load(), self.controller.health_check()]
    }

    /// Translate a key press into state changes and commands to dispatch.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }
        if matches!(self.controller.phase(), Phase::Failed(_)) {
            return self.handle_failed_key(code);
        }
        match self.focus {
            Focus::Input => self.handle_input_key(code),
            Focus::List => self.handle_list_key(code),
        }
    }

    fn handle_failed_key(&mut self, code: KeyCode) -> Vec<Command> {
        match code {
            KeyCode::Char('r') | KeyCode::Enter => vec![self.controller.load()],
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) -> Vec<Command> {
        match code {
            KeyCode::Enter => match self.controller.add(&self.input) {
                Some(command) => {
                    self.input.clear();
                    vec![command]
                }
                // Blank text, or an add already in flight. Keep whatever is
                // typed so the user can retry.
                None => Vec::new(),
            },
            KeyCode::Backspace => {
                self.input.pop();
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Down => {
                self.focus = Focus::List;
                Vec::new()
            }
            KeyCode::Tab => {
                self.cycle_filter();
                Vec::new()
            }
            KeyCode::Char(ch) => {
                if self.input.chars().count() < INPUT_LIMIT {
                    self.input.push(ch);
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Vec<Command> {
        if self.move_mode {
            return match code {
                KeyCode::Up | KeyCode::Char('k') => self.move_selected(-1),
                KeyCode::Down | KeyCode::Char('j') => self.move_selected(1),
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('m') => {
                    self.move_mode = false;
                    Vec::new()
                }
                _ => Vec::new(),
            };
        }
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Char('i') | KeyCode::Char('/') => {
                self.focus = Focus::Input;
                Vec::new()
            }
            KeyCode::Tab => {
                self.cycle_filter();
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.controller.visible_items().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
                Vec::new()
            }
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('c') => self.controller.clear_completed().into_iter().collect(),
            KeyCode::Char('r') => vec![self.controller.load()],
            KeyCode::Char('m') => {
                if self.selected_id().is_some() {
                    self.move_mode = true;
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn selected_id(&self) -> Option<Uuid> {
        self.controller
            .visible_items()
            .get(self.selected)
            .map(|item| item.id)
    }

    fn toggle_selected(&mut self) -> Vec<Command> {
        let Some(id) = self.selected_id() else {
            return Vec::new();
        };
        self.controller.toggle(id).into_iter().collect()
    }

    fn delete_selected(&mut self) -> Vec<Command> {
        let Some(id) = self.selected_id() else {
            return Vec::new();
        };
        let commands: Vec<Command> = self.controller.delete(id).into_iter().collect();
        self.clamp_selection();
        commands
    }

    /// Swap the grabbed item with its neighbor in the visible list and ship
    /// the whole visible sequence as the new order.
    fn move_selected(&mut self, delta: isize) -> Vec<Command> {
        let mut ids: Vec<Uuid> = self
            .controller
            .visible_items()
            .iter()
            .map(|item| item.id)
            .collect();
        let from = self.selected;
        let to = from as isize + delta;
        if from >= ids.len() || to < 0 || to as usize >= ids.len() {
            return Vec::new();
        }
        let to = to as usize;
        ids.swap(from, to);
        self.selected = to;
        self.controller.reorder(&ids).into_iter().collect()
    }

    fn cycle_filter(&mut self) {
        let next = match self.controller.filter() {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        };
        self.controller.set_filter(next);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let last = self.controller.visible_items().len().saturating_sub(1);
        self.selected = self.selected.min(last);
    }

    // --- completions ---

    /// Feed a finished round-trip into the controller and collect any
    /// follow-up commands (a resync reload) to dispatch.
    pub fn finish(&mut self, command: Command, outcome: Result<HttpResponse, String>) -> Vec<Command> {
        let recovery = self.controller.complete(command, outcome);
        self.absorb_notices();
        self.clamp_selection();
        match recovery {
            Recovery::Reload(command) => vec![command],
            Recovery::None => Vec::new(),
        }
    }

    fn absorb_notices(&mut self) {
        let now = Instant::now();
        for notice in self.controller.take_notices() {
            self.toasts.push(Toast {
                level: notice.level,
                message: notice.message,
                expires: now + TOAST_TTL,
            });
        }
    }

    pub fn prune_toasts(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|toast| toast.expires > now);
    }

    // --- event loop ---

    fn dispatch(&self, command: Command) {
        let client = self.http.clone();
        let sender = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = net::execute(&client, &command.request).await;
            let _ = sender.send((command, outcome));
        });
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut events = EventStream::new();
        let mut tick = interval(TICK);

        for command in self.startup() {
            self.dispatch(command);
        }

        loop {
            terminal.draw(|frame| ui::draw(frame, &self))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                _ = tick.tick() => {
                    self.prune_toasts();
                }
                completion = self.completions_rx.recv() => {
                    if let Some((command, outcome)) = completion {
                        for follow_up in self.finish(command, outcome) {
                            self.dispatch(follow_up);
                        }
                    }
                }
                event = events.next() => {
                    match event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            for command in self.handle_key(key.code, key.modifiers) {
                                self.dispatch(command);
                            }
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => return Err(err.into()),
                        None => break,
                    }
                }
            }
        }

        Ok(())
    }
}
