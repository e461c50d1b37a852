use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::store::KeyValueStore;
use crate::model::{Config, Layout, Priority, Task, TaskId};
use crate::ops::session::Session;
use crate::ops::view::Filter;
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// Longest text the input fields accept, in characters
pub const MAX_INPUT_CHARS: usize = 500;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the add bar
    Add,
    /// Editing the text of one task inline
    Edit,
}

/// Single-line text field with a grapheme-aware cursor (byte offset)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    pub text: String,
    pub cursor: usize,
}

impl LineInput {
    /// A field holding `text` with the cursor at the end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        LineInput { text, cursor }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Insert at the cursor. Returns false when the field is full.
    pub fn insert(&mut self, c: char) -> bool {
        if self.text.chars().count() >= MAX_INPUT_CHARS {
            return false;
        }
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    /// Insert pasted text, newlines folded to spaces, up to the length cap.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            if !self.insert(c) {
                break;
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Cursor position in terminal cells
    pub fn cursor_col(&self) -> usize {
        unicode::byte_offset_to_display_col(&self.text, self.cursor)
    }
}

/// Main application state
pub struct App {
    pub session: Session<Box<dyn KeyValueStore>>,
    pub data_dir: PathBuf,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub layout: Layout,
    pub show_completed_date: bool,
    /// Index of the selected task within the shown list
    pub cursor: usize,
    /// First visible row of the shown list
    pub scroll_offset: usize,
    pub add_input: LineInput,
    /// Priority chosen in the add bar
    pub add_priority: Priority,
    pub edit_input: LineInput,
    /// One-line message for the status row, cleared on the next key
    pub status: Option<String>,
}

impl App {
    pub fn new(session: Session<Box<dyn KeyValueStore>>, config: &Config, data_dir: PathBuf) -> Self {
        let add_priority = session.defaults().priority;
        App {
            session,
            data_dir,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            layout: config.ui.layout,
            show_completed_date: config.ui.show_completed_date,
            cursor: 0,
            scroll_offset: 0,
            add_input: LineInput::default(),
            add_priority,
            edit_input: LineInput::default(),
            status: None,
        }
    }

    /// The list under the cursor: the focused column on the board, the
    /// filtered list otherwise. Both follow the session filter.
    pub fn shown_tasks(&self) -> Vec<&Task> {
        match self.layout {
            Layout::Board => self.session.board().column(self.session.filter()).to_vec(),
            Layout::List => self.session.visible(),
        }
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.shown_tasks().get(self.cursor).map(|t| t.id.clone())
    }

    /// Keep the cursor inside the shown list
    pub fn clamp_cursor(&mut self) {
        let len = self.shown_tasks().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Move the cursor onto `id` if it is shown
    pub fn select(&mut self, id: &TaskId) {
        if let Some(idx) = self.shown_tasks().iter().position(|t| &t.id == id) {
            self.cursor = idx;
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if filter != self.session.filter() {
            self.session.set_filter(filter);
            self.cursor = 0;
            self.scroll_offset = 0;
        }
    }

    /// Surface a failed snapshot write in the status row
    pub fn check_save_error(&mut self) {
        if let Some(e) = self.session.take_save_error() {
            self.status = Some(format!("save failed: {}", e));
        }
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let ui_state = match read_ui_state(&app.data_dir) {
        Some(s) => s,
        None => return,
    };
    app.session.set_filter(ui_state.filter);
    if let Some(layout) = ui_state.layout {
        app.layout = layout;
    }
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let ui_state = UiState {
        filter: app.session.filter(),
        layout: Some(app.layout),
    };
    if let Err(e) = write_ui_state(&app.data_dir, &ui_state) {
        log::warn!("event=ui_state_write_failed error={}", e);
    }
}

/// Run the TUI application
pub fn run(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    restore_ui_state(app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    log::info!("event=tui_start tasks={}", app.session.tasks().len());
    let result = run_event_loop(&mut terminal, app);

    save_ui_state(app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
