//! History sidebar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use weava_core::StorySegment;

use crate::ui::theme::StoryTheme;

/// Widget for the path taken so far: each archived segment with the
/// choice that led away from it.
pub struct HistoryWidget<'a> {
    history: &'a [StorySegment],
    theme: &'a StoryTheme,
}

impl<'a> HistoryWidget<'a> {
    pub fn new(history: &'a [StorySegment], theme: &'a StoryTheme) -> Self {
        Self { history, theme }
    }
}

impl Widget for HistoryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Your Path ({}) ", self.history.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.history.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No choices yet.",
                self.theme.system_style(),
            )))
            .render(inner, buf);
            return;
        }

        // Bottom-anchored: show the most recent entries that fit.
        let per_entry = 3usize;
        let capacity = (inner.height as usize / per_entry).max(1);
        let start = self.history.len().saturating_sub(capacity);
        let width = inner.width.saturating_sub(2) as usize;

        let mut lines: Vec<Line> = Vec::new();
        if start > 0 {
            lines.push(Line::from(Span::styled(
                format!("↑ {start} earlier"),
                self.theme.system_style(),
            )));
        }
        for segment in &self.history[start..] {
            lines.push(Line::from(Span::styled(
                snippet(&segment.text, width),
                self.theme.history_style(),
            )));
            let choice = segment.choice_made.as_deref().unwrap_or("…");
            lines.push(Line::from(Span::styled(
                format!("→ {}", snippet(choice, width.saturating_sub(2))),
                self.theme.history_choice_style(),
            )));
            lines.push(Line::from(""));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// First line of `text`, truncated to `max_chars` characters.
pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncates_on_character_boundaries() {
        assert_eq!(snippet("short", 10), "short");
        assert_eq!(snippet("ééééé", 3), "éé…");
        assert_eq!(snippet("first line\nsecond", 20), "first line");
    }
}
