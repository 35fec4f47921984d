//! Rendering for the terminal client.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use todo_core::{Filter, NoticeLevel, Phase, Stats, Todo};

use crate::app::{App, Focus};

// Minimal color palette
const ACCENT_COLOR: Color = Color::Rgb(186, 139, 255); // Purple accent
const DONE_COLOR: Color = Color::Rgb(129, 199, 132); // Soft green
const DIM_COLOR: Color = Color::Rgb(120, 120, 120); // Gray
const WARN_COLOR: Color = Color::Rgb(255, 193, 7); // Amber
const ERROR_COLOR: Color = Color::Rgb(229, 115, 115); // Soft red

// Spinner frames for animated status
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn spinner(elapsed: f32) -> &'static str {
    SPINNER_FRAMES[(elapsed * 12.5) as usize % SPINNER_FRAMES.len()]
}

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    match app.controller().phase() {
        Phase::Loading => draw_loading(frame, app, area),
        Phase::Failed(message) => draw_failed(frame, message, area),
        Phase::Ready => draw_ready(frame, app, area),
    }
    draw_toasts(frame, app, area);
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            spinner(app.animation_elapsed()),
            Style::default().fg(ACCENT_COLOR),
        ),
        Span::styled(" Loading todos…", Style::default().fg(DIM_COLOR)),
    ]);
    let rect = Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), rect);
}

fn draw_failed(frame: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("✗ {message}"),
            Style::default().fg(ERROR_COLOR),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "r retry · q quit",
            Style::default().fg(DIM_COLOR),
        )),
    ];
    let rect = Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 3.min(area.height),
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

fn draw_ready(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Input
            Constraint::Length(1), // Filter tabs
            Constraint::Min(1),    // List
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_input(frame, app, chunks[1]);
    draw_filters(frame, app, chunks[2]);
    draw_list(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.controller().stats();
    let summary = format!(
        "{} total · {} done · {}%",
        stats.total, stats.completed, stats.completion_rate
    );
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(summary.chars().count() as u16),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Todo List", Style::default().fg(ACCENT_COLOR).bold()),
            Span::styled(
                format!(" v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(DIM_COLOR),
            ),
        ])),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(summary, Style::default().fg(DIM_COLOR))),
        columns[1],
    );
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus() == Focus::Input;
    let adding = app.controller().is_adding();
    let prompt_style = if focused {
        Style::default().fg(ACCENT_COLOR)
    } else {
        Style::default().fg(DIM_COLOR)
    };

    let mut spans = vec![
        Span::styled("> ", prompt_style),
        Span::raw(app.input().to_string()),
    ];
    if adding {
        spans.push(Span::styled(
            format!(" {} adding…", spinner(app.animation_elapsed())),
            Style::default().fg(WARN_COLOR),
        ));
    } else if app.input().is_empty() {
        let hint = if focused {
            "What needs to be done?"
        } else {
            "press i to add a todo"
        };
        spans.push(Span::styled(hint, Style::default().fg(DIM_COLOR).dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if focused && !adding {
        let cursor_x = area.x + 2 + app.input().chars().count() as u16;
        let max_x = area.x + area.width.saturating_sub(1);
        frame.set_cursor_position(Position::new(cursor_x.min(max_x), area.y));
    }
}

fn draw_filters(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.controller().stats();
    let current = app.controller().filter();
    let mut spans = Vec::new();
    for (filter, count) in [
        (Filter::All, stats.total),
        (Filter::Active, stats.active),
        (Filter::Completed, stats.completed),
    ] {
        let style = if filter == current {
            Style::default().fg(ACCENT_COLOR).bold()
        } else {
            Style::default().fg(DIM_COLOR)
        };
        spans.push(Span::styled(format!("{} ({count})", filter.label()), style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        "tab to switch",
        Style::default().fg(DIM_COLOR).dim(),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.controller().visible_items();
    if visible.is_empty() {
        let message = match app.controller().filter() {
            Filter::All => "No todos yet. Add one above!",
            Filter::Active => "No active todos!",
            Filter::Completed => "No completed todos!",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                message,
                Style::default().fg(DIM_COLOR).italic(),
            )),
            area,
        );
        return;
    }

    let listing = app.focus() == Focus::List;
    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .map(|(index, item)| item_line(item, listing && index == app.selected(), app.is_moving()))
        .collect();

    // Keep the selection on screen.
    let height = area.height as usize;
    let scroll = if height > 0 && app.selected() + 1 > height {
        (app.selected() + 1 - height) as u16
    } else {
        0
    };
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
}

fn item_line(item: &Todo, selected: bool, moving: bool) -> Line<'static> {
    let marker = if selected && moving {
        Span::styled("◆ ", Style::default().fg(WARN_COLOR))
    } else if selected {
        Span::styled("› ", Style::default().fg(ACCENT_COLOR))
    } else {
        Span::raw("  ")
    };
    let check = if item.completed {
        Span::styled("✓ ", Style::default().fg(DONE_COLOR))
    } else {
        Span::styled("○ ", Style::default().fg(DIM_COLOR))
    };
    let text_style = if item.completed {
        Style::default().fg(DIM_COLOR).crossed_out()
    } else {
        Style::default()
    };
    Line::from(vec![marker, check, Span::styled(item.text.clone(), text_style)])
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.controller().stats();
    let mut spans = vec![Span::styled(
        items_left_label(&stats),
        Style::default().fg(DIM_COLOR),
    )];
    if app.controller().is_clearing() {
        spans.push(Span::styled(
            format!("  {} clearing…", spinner(app.animation_elapsed())),
            Style::default().fg(WARN_COLOR),
        ));
    } else if stats.completed > 0 {
        spans.push(Span::styled(
            "  c clear completed",
            Style::default().fg(DIM_COLOR).dim(),
        ));
    }

    let hints = "space toggle · d delete · m move · r reload · q quit";
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(hints.chars().count() as u16),
        ])
        .split(area);
    frame.render_widget(Paragraph::new(Line::from(spans)), columns[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(DIM_COLOR).dim())),
        columns[1],
    );
}

fn items_left_label(stats: &Stats) -> String {
    if stats.total == 0 {
        "No todos".to_string()
    } else if stats.active == 0 {
        "All done!".to_string()
    } else if stats.active == 1 {
        "1 item left".to_string()
    } else {
        format!("{} items left", stats.active)
    }
}

fn draw_toasts(frame: &mut Frame, app: &App, area: Rect) {
    let toasts = app.toasts();
    if toasts.is_empty() {
        return;
    }
    let show = toasts.len().min(3);
    let lines: Vec<Line> = toasts[toasts.len() - show..]
        .iter()
        .map(|toast| {
            let color = match toast.level {
                NoticeLevel::Success => DONE_COLOR,
                NoticeLevel::Warning => WARN_COLOR,
                NoticeLevel::Error => ERROR_COLOR,
            };
            Line::from(Span::styled(
                toast.message.clone(),
                Style::default().fg(color),
            ))
            .alignment(Alignment::Right)
        })
        .collect();
    let height = show as u16;
    let rect = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height),
        width: area.width,
        height: height.min(area.height),
    };
    frame.render_widget(Paragraph::new(lines), rect);
}
