use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::{KeyValueStore, MemoryStore};
use crate::model::{Config, Priority};
use crate::ops::session::Session;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an in-memory store holding `(text, priority, completed)`
/// tasks, created a second apart from 2024-05-01 10:00 UTC.
pub fn app_with_tasks(specs: &[(&str, Priority, bool)]) -> App {
    let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
    let mut session = Session::open(store, Default::default()).unwrap();
    for (i, (text, priority, completed)) in specs.iter().enumerate() {
        let at = Utc.timestamp_opt(1_714_557_600 + i as i64, 0).unwrap();
        let id = session.add_at(text, Some(*priority), None, at).unwrap();
        if *completed {
            session.toggle(&id).unwrap();
        }
    }
    App::new(
        session,
        &Config::default(),
        PathBuf::from("/tmp/tally-test"),
    )
}
