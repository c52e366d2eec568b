//! Choice list widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use weava_core::Choice;

use crate::ui::theme::StoryTheme;

/// Widget for the numbered choices under the current segment
pub struct ChoiceListWidget<'a> {
    choices: &'a [Choice],
    selected: usize,
    theme: &'a StoryTheme,
}

impl<'a> ChoiceListWidget<'a> {
    pub fn new(choices: &'a [Choice], theme: &'a StoryTheme) -> Self {
        Self {
            choices,
            selected: 0,
            theme,
        }
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for ChoiceListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" What happens next? ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, choice) in self.choices.iter().enumerate() {
            let is_selected = i == self.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}. {}", i + 1, choice.text),
                self.theme.choice_style(is_selected),
            )));
            if let Some(hint) = &choice.consequence {
                lines.push(Line::from(Span::styled(
                    format!("     {hint}"),
                    self.theme.consequence_style(),
                )));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
