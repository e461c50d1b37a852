use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout as Split, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::{input_spans, spans_width};
use crate::model::{Layout, Task};
use crate::ops::guard;
use crate::ops::view::Filter;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Render the task area in the current layout
pub fn render_tasks(frame: &mut Frame, app: &mut App, area: Rect) {
    app.clamp_cursor();
    let body_rows = (area.height as usize).saturating_sub(1);
    app.scroll_offset = {
        let shown = app.shown_tasks();
        scroll_start(app, &shown, body_rows)
    };
    match app.layout {
        Layout::Board => render_board(frame, app, area),
        Layout::List => {
            let filter = app.session.filter();
            let tasks = app.session.visible();
            let rows = column_lines(app, filter, &tasks, area, true);
            frame.render_widget(Paragraph::new(rows), area);
        }
    }
}

/// Three columns side by side, the focused one follows the session filter
fn render_board(frame: &mut Frame, app: &mut App, area: Rect) {
    let cols = Split::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let focused = app.session.filter();
    for (filter, col) in Filter::ALL.into_iter().zip(cols.iter()) {
        let board = app.session.board();
        let tasks = board.column(filter);
        let rows = column_lines(app, filter, tasks, *col, filter == focused);
        frame.render_widget(Paragraph::new(rows), *col);
    }
}

/// Lines of one column: heading, then tasks (or the empty message). The
/// focused column scrolls to keep the cursor in view.
fn column_lines<'a>(
    app: &App,
    filter: Filter,
    tasks: &[&Task],
    area: Rect,
    focused: bool,
) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut lines = Vec::new();

    let heading_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    let mut heading = vec![Span::styled(
        format!(" {} ({})", filter.title(), tasks.len()),
        heading_style,
    )];
    if filter == Filter::Completed && !tasks.is_empty() {
        heading.push(Span::styled(
            "  C clear",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    lines.push(Line::from(heading));

    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("   {}", filter.empty_message()),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
        return lines;
    }

    let body_rows = (area.height as usize).saturating_sub(1);
    let start = if focused { app.scroll_offset } else { 0 };
    for (idx, task) in tasks.iter().enumerate().skip(start) {
        let selected = focused && idx == app.cursor;
        lines.push(task_line(app, task, selected, width));
        if task.completed && app.show_completed_date {
            lines.push(Line::from(Span::styled(
                format!(
                    "    Completed on {}",
                    task.created_at.format("%Y-%m-%d")
                ),
                Style::default().fg(app.theme.dim).bg(bg),
            )));
        }
        if lines.len() > body_rows {
            break;
        }
    }
    lines
}

fn task_height(app: &App, task: &Task) -> usize {
    if task.completed && app.show_completed_date {
        2
    } else {
        1
    }
}

/// First task to draw so the cursor row fits in `rows` lines
fn scroll_start(app: &App, tasks: &[&Task], rows: usize) -> usize {
    if tasks.is_empty() {
        return 0;
    }
    let cursor = app.cursor.min(tasks.len() - 1);
    let mut start = app.scroll_offset.min(cursor);
    loop {
        let used: usize = tasks[start..=cursor]
            .iter()
            .map(|t| task_height(app, t))
            .sum();
        if used <= rows || start == cursor {
            return start;
        }
        start += 1;
    }
}

/// Text cells a row keeps before its badges are shortened, then dropped
const MIN_TEXT_ROOM: usize = 12;

/// Category and priority badges: full names, or initials (`P H`) when
/// `compact`.
fn badge_spans<'a>(app: &App, task: &Task, base: Style, compact: bool) -> Vec<Span<'a>> {
    let (category, priority) = if compact {
        (
            task.category.as_str()[..1].to_ascii_uppercase(),
            task.priority.as_str()[..1].to_ascii_uppercase(),
        )
    } else {
        (
            task.category.as_str().to_string(),
            task.priority.as_str().to_string(),
        )
    };
    vec![
        Span::styled(" ", base),
        Span::styled(category, base.fg(app.theme.category_color(task.category))),
        Span::styled(" ", base),
        Span::styled(priority, base.fg(app.theme.priority_color(task.priority))),
        Span::styled(" ", base),
    ]
}

/// One task row: check mark, text (or the edit field), category and
/// priority badges.
fn task_line<'a>(app: &App, task: &Task, selected: bool, width: usize) -> Line<'a> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let base = Style::default().bg(bg);

    let marker = if selected { "\u{258E}" } else { " " }; // ▎
    let check = if task.completed { "[x] " } else { "[ ] " };
    let mut spans = vec![
        Span::styled(marker, base.fg(app.theme.selection_border)),
        Span::styled(
            check,
            base.fg(if task.completed {
                app.theme.green
            } else {
                app.theme.dim
            }),
        ),
    ];

    let lead = spans_width(&spans);
    let mut badges = badge_spans(app, task, base, false);
    if width.saturating_sub(lead + spans_width(&badges)) < MIN_TEXT_ROOM {
        badges = badge_spans(app, task, base, true);
    }
    if width.saturating_sub(lead + spans_width(&badges)) < MIN_TEXT_ROOM {
        badges.clear();
    }
    let text_room = width.saturating_sub(lead + spans_width(&badges));

    let editing = app.mode == Mode::Edit && app.session.is_editing(&task.id);
    if editing {
        let field = input_spans(
            &app.edit_input,
            text_room,
            base.fg(app.theme.text_bright),
            base.fg(app.theme.highlight),
        );
        let used = spans_width(&field);
        spans.extend(field);
        spans.push(Span::styled(" ".repeat(text_room.saturating_sub(used)), base));
    } else {
        let mut text_style = base.fg(if selected {
            app.theme.text_bright
        } else {
            app.theme.text
        });
        if task.completed {
            text_style = text_style
                .fg(app.theme.dim)
                .add_modifier(Modifier::CROSSED_OUT);
        }
        let text = unicode::truncate_to_width(&guard::decode_entities(&task.text), text_room);
        let pad = text_room.saturating_sub(unicode::display_width(&text));
        spans.push(Span::styled(text, text_style));
        spans.push(Span::styled(" ".repeat(pad), base));
    }

    spans.extend(badges);
    Line::from(spans)
}
