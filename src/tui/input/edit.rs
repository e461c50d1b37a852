use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::guard::GuardError;
use crate::ops::session::SessionError;
use crate::ops::task_ops::TaskError;
use crate::tui::app::{App, LineInput, Mode};

/// Cursor and text keys shared by both fields. Returns true when the text
/// changed.
fn edit_line(input: &mut LineInput, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => {
            input.backspace();
            true
        }
        KeyCode::Delete => {
            input.delete();
            true
        }
        KeyCode::Left => {
            input.left();
            false
        }
        KeyCode::Right => {
            input.right();
            false
        }
        KeyCode::Home => {
            input.home();
            false
        }
        KeyCode::End => {
            input.end();
            false
        }
        _ => false,
    }
}

pub(super) fn handle_add(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.add_input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab => app.add_priority = app.add_priority.cycle(),
        KeyCode::Enter => {
            let text = app.add_input.text.clone();
            match app.session.add(&text, Some(app.add_priority), None) {
                Ok(id) => {
                    app.add_input.clear();
                    app.add_priority = app.session.defaults().priority;
                    app.select(&id);
                }
                Err(SessionError::Task(TaskError::Rejected(GuardError::Empty))) => {}
                Err(SessionError::Task(TaskError::Rejected(GuardError::Unsafe))) => {
                    app.status = Some("unsafe content rejected".into());
                }
                Err(e) => app.status = Some(e.to_string()),
            }
        }
        _ => {
            edit_line(&mut app.add_input, key);
        }
    }
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.session.cancel_edit();
            app.edit_input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            if !app.session.can_save() {
                return;
            }
            match app.session.save_edit() {
                Ok(id) => {
                    app.edit_input.clear();
                    app.mode = Mode::Navigate;
                    app.select(&id);
                }
                Err(e) => {
                    app.status = Some(e.to_string());
                    // The task went away under the edit
                    if app.session.editing().is_none() {
                        app.edit_input.clear();
                        app.mode = Mode::Navigate;
                        app.clamp_cursor();
                    }
                }
            }
        }
        _ => {
            if edit_line(&mut app.edit_input, key) {
                app.session.set_buffer(app.edit_input.text.clone());
            }
        }
    }
}
