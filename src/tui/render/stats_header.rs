use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Render the counters row: Total, Active, Completed, Progress
pub fn render_stats_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.session.stats();
    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let sep = Span::styled(" \u{2502} ", Style::default().fg(app.theme.dim).bg(bg));

    let value = |color| {
        Style::default()
            .fg(color)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    };

    let spans = vec![
        Span::styled(" Total ", label),
        Span::styled(stats.total.to_string(), value(app.theme.text_bright)),
        sep.clone(),
        Span::styled("Active ", label),
        Span::styled(stats.active.to_string(), value(app.theme.cyan)),
        sep.clone(),
        Span::styled("Completed ", label),
        Span::styled(stats.completed.to_string(), value(app.theme.green)),
        sep,
        Span::styled("Progress ", label),
        Span::styled(
            format!("{}%", stats.completion_rate),
            value(app.theme.highlight),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
