pub mod add_bar;
pub mod board_view;
pub mod helpers;
pub mod stats_header;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: stats (1) | add bar (1) | separator (1) | content | status row (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    stats_header::render_stats_header(frame, app, chunks[0]);
    add_bar::render_add_bar(frame, app, chunks[1]);

    let sep = Line::from(Span::styled(
        "\u{2500}".repeat(chunks[2].width as usize),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ));
    frame.render_widget(Paragraph::new(sep), chunks[2]);

    board_view::render_tasks(frame, app, chunks[3]);
    status_row::render_status_row(frame, app, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn full_screen_shows_every_region() {
        let mut app = app_with_tasks(&[("Buy milk", Priority::High, false)]);
        let output = render_to_string(TERM_W, TERM_H, |frame, _area| {
            render(frame, &mut app);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("Total 1"));
        assert!(lines[1].contains("a add task"));
        assert!(lines[2].starts_with("\u{2500}\u{2500}"));
        assert!(output.contains("Buy milk"));
    }
}
