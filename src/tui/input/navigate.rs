use crossterm::event::{KeyCode, KeyEvent};

use crate::model::Layout;
use crate::ops::guard;
use crate::ops::view::Filter;
use crate::tui::app::{App, LineInput, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('a') => {
            app.add_input.clear();
            app.add_priority = app.session.defaults().priority;
            app.mode = Mode::Add;
        }

        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.cursor += 1;
            app.clamp_cursor();
        }
        KeyCode::Home | KeyCode::Char('g') => app.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.cursor = app.shown_tasks().len().saturating_sub(1);
        }

        KeyCode::Left | KeyCode::Char('h') if app.layout == Layout::Board => {
            move_column(app, -1);
        }
        KeyCode::Right | KeyCode::Char('l') if app.layout == Layout::Board => {
            move_column(app, 1);
        }

        KeyCode::Char('f') => {
            let next = app.session.filter().cycle();
            app.set_filter(next);
        }
        KeyCode::Char('v') => {
            app.layout = app.layout.toggle();
            app.clamp_cursor();
        }

        KeyCode::Char(' ') | KeyCode::Char('x') => toggle_selected(app),
        KeyCode::Char('e') | KeyCode::Enter => start_edit(app),
        KeyCode::Char('d') | KeyCode::Delete => delete_selected(app),
        KeyCode::Char('C') => clear_completed(app),

        _ => {}
    }
}

/// Focus the neighbouring board column, stopping at the edges
fn move_column(app: &mut App, delta: isize) {
    let current = Filter::ALL
        .iter()
        .position(|f| *f == app.session.filter())
        .unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, Filter::ALL.len() as isize - 1) as usize;
    app.set_filter(Filter::ALL[next]);
}

fn toggle_selected(app: &mut App) {
    let Some(id) = app.selected_id() else {
        return;
    };
    if let Err(e) = app.session.toggle(&id) {
        app.status = Some(e.to_string());
        return;
    }
    // The task may have left the focused column
    if app.shown_tasks().iter().any(|t| t.id == id) {
        app.select(&id);
    }
    app.clamp_cursor();
}

fn start_edit(app: &mut App) {
    let Some(id) = app.selected_id() else {
        return;
    };
    let Some(task) = app.session.find(&id) else {
        return;
    };
    // The field shows what the board shows: stored text, decoded once
    let text = guard::decode_entities(&task.text);
    if let Err(e) = app.session.start_edit(&id) {
        app.status = Some(e.to_string());
        return;
    }
    app.edit_input = LineInput::with_text(text);
    app.session.set_buffer(app.edit_input.text.clone());
    app.mode = Mode::Edit;
}

fn delete_selected(app: &mut App) {
    let Some(id) = app.selected_id() else {
        return;
    };
    if let Err(e) = app.session.delete(&id) {
        app.status = Some(e.to_string());
    }
    app.clamp_cursor();
}

fn clear_completed(app: &mut App) {
    let removed = app.session.clear_completed();
    app.status = Some(match removed {
        0 => "no completed tasks".to_string(),
        1 => "cleared 1 completed task".to_string(),
        n => format!("cleared {} completed tasks", n),
    });
    app.clamp_cursor();
}
