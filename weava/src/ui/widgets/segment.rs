//! Story segment display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use weava_core::StorySegment;

use crate::ui::theme::StoryTheme;

/// Widget for the current segment's prose
pub struct SegmentWidget<'a> {
    segment: &'a StorySegment,
    theme: &'a StoryTheme,
    scroll: usize,
}

impl<'a> SegmentWidget<'a> {
    pub fn new(segment: &'a StorySegment, theme: &'a StoryTheme) -> Self {
        Self {
            segment,
            theme,
            scroll: 0,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for SegmentWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Story ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        // One Line per source line; paragraph breaks come through as the
        // empty lines already present in the text.
        let mut lines: Vec<Line> = self
            .segment
            .text
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), self.theme.story_style())))
            .collect();

        if self.segment.is_end {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "· The End ·",
                self.theme.end_style(),
            )));
        }

        // Calculate scroll position
        let visible_height = inner.height as usize;
        let total_lines = lines.len();
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        let paragraph = Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false });

        paragraph.render(inner, buf);

        // Render scrollbar if content exceeds visible area
        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);

            // Scroll position hints at the panel edges
            if scroll > 0 {
                let hint = format!(" ↑{scroll} ");
                write_hint(buf, inner, inner.y, &hint);
            }
            if scroll < max_scroll {
                let remaining = max_scroll - scroll;
                let hint = format!(" ↓{remaining} more ");
                let hint_y = inner.y + inner.height.saturating_sub(1);
                write_hint(buf, inner, hint_y, &hint);
            }
        }
    }
}

fn write_hint(buf: &mut Buffer, inner: Rect, y: u16, hint: &str) {
    let style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);
    for (i, ch) in hint.chars().enumerate() {
        let x = inner.x + (i as u16);
        if x < inner.x + inner.width.saturating_sub(2) {
            buf[(x, y)].set_char(ch).set_style(style);
        }
    }
}
