use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::model::Layout;
use crate::tui::app::{App, Mode};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    if let Some(message) = &app.status {
        spans.push(Span::styled(
            format!(" {}", message),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    let hint = match app.mode {
        Mode::Navigate => {
            if app.layout == Layout::Board {
                "a add  x toggle  e edit  d del  C clear  h/l column  v list  q quit"
            } else {
                "a add  x toggle  e edit  d del  C clear  f filter  v board  q quit"
            }
        }
        Mode::Add => "Enter add  Tab priority  Esc done",
        Mode::Edit => {
            if !app.session.can_save() && app.status.is_none() {
                let problem = if app.edit_input.text.trim().is_empty() {
                    "text required"
                } else {
                    "unsafe content"
                };
                spans.push(Span::styled(
                    format!(" {}", problem),
                    Style::default().fg(app.theme.red).bg(bg),
                ));
            }
            "Enter save  Esc cancel"
        }
    };

    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count();
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
