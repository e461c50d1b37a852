mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use edit::{handle_add, handle_edit};
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.session.cancel_edit();
        app.should_quit = true;
        return;
    }
    app.status = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add => handle_add(app, key),
        Mode::Edit => handle_edit(app, key),
    }
    app.check_save_error();
}

/// Handle a bracketed paste event. Only the text fields take pasted text.
pub fn handle_paste(app: &mut App, text: &str) {
    match app.mode {
        Mode::Add => app.add_input.insert_str(text),
        Mode::Edit => {
            app.edit_input.insert_str(text);
            app.session.set_buffer(app.edit_input.text.clone());
        }
        Mode::Navigate => {}
    }
}
