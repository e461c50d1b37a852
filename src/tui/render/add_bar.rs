use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::{input_spans, spans_width};
use crate::tui::app::{App, Mode};

/// Render the add bar: a prompt while navigating, the text field and the
/// priority selector while adding.
pub fn render_add_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let prompt = Span::styled(
        " + ",
        Style::default()
            .fg(app.theme.purple)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );

    let line = if app.mode == Mode::Add {
        let selector = vec![
            Span::styled(" [", Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled(
                app.add_priority.as_str(),
                Style::default()
                    .fg(app.theme.priority_color(app.add_priority))
                    .bg(bg),
            ),
            Span::styled("] ", Style::default().fg(app.theme.dim).bg(bg)),
        ];
        let field_width = width.saturating_sub(3 + spans_width(&selector));
        let mut spans = vec![prompt];
        let field = input_spans(
            &app.add_input,
            field_width,
            Style::default().fg(app.theme.text_bright).bg(bg),
            Style::default().fg(app.theme.highlight).bg(bg),
        );
        let used = spans_width(&field);
        spans.extend(field);
        spans.push(Span::styled(
            " ".repeat(field_width.saturating_sub(used)),
            Style::default().bg(bg),
        ));
        spans.extend(selector);
        Line::from(spans)
    } else {
        Line::from(vec![
            prompt,
            Span::styled("a add task", Style::default().fg(app.theme.dim).bg(bg)),
        ])
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
