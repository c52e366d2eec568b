//! Seed input widget for the create overlay

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use weava_core::seed::MAX_SEED_CHARS;

use crate::ui::theme::StoryTheme;

/// Free-text input for the reader's story idea
pub struct SeedInputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a StoryTheme,
    placeholder: &'a str,
    is_active: bool,
}

impl<'a> SeedInputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a StoryTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            placeholder: "Describe your story idea...",
            is_active: true,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

impl Widget for SeedInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.content.chars().count();
        let block = Block::default()
            .title(format!(" Your idea ({count}/{MAX_SEED_CHARS}) "))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.content.is_empty() {
            Line::from(Span::styled(
                self.placeholder,
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            // Use character-based slicing for unicode safety
            let before: String = self.content.chars().take(self.cursor_position).collect();
            let at = self
                .content
                .chars()
                .nth(self.cursor_position)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after: String = if self.cursor_position < count {
                self.content.chars().skip(self.cursor_position + 1).collect()
            } else {
                String::new()
            };

            Line::from(vec![
                Span::raw(before),
                Span::styled(
                    at,
                    Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
                ),
                Span::raw(after),
            ])
        };

        Paragraph::new(line)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
