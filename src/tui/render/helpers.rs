use ratatui::style::Style;
use ratatui::text::Span;

use crate::tui::app::LineInput;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Spans for a text field with a block cursor, scrolled so the cursor stays
/// inside `width` cells.
pub(super) fn input_spans(
    input: &LineInput,
    width: usize,
    text_style: Style,
    cursor_style: Style,
) -> Vec<Span<'static>> {
    if width == 0 {
        return Vec::new();
    }
    let before = &input.text[..input.cursor];
    let after = &input.text[input.cursor..];

    let shown_before = unicode::tail_to_width(before, width - 1);
    let room = width.saturating_sub(unicode::display_width(shown_before) + 1);
    let shown_after = unicode::clip_to_width(after, room);

    vec![
        Span::styled(shown_before.to_string(), text_style),
        Span::styled("\u{258C}", cursor_style), // ▌ cursor
        Span::styled(shown_after.to_string(), text_style),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn short_input_is_shown_whole() {
        let mut input = LineInput::with_text("hello");
        input.left();
        let spans = input_spans(&input, 20, Style::default(), Style::default());
        assert_eq!(joined(&spans), "hell\u{258C}o");
        assert_eq!(spans_width(&spans), 6);
    }

    #[test]
    fn long_input_scrolls_to_cursor() {
        let input = LineInput::with_text("abcdefghij");
        let spans = input_spans(&input, 5, Style::default(), Style::default());
        assert_eq!(joined(&spans), "ghij\u{258C}");
    }

    #[test]
    fn text_after_cursor_is_clipped() {
        let mut input = LineInput::with_text("abcdefghij");
        input.home();
        let spans = input_spans(&input, 5, Style::default(), Style::default());
        assert_eq!(joined(&spans), "\u{258C}abcd");
    }
}
