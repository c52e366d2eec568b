//! Color theme and styling for the story reader TUI

use ratatui::style::{Color, Modifier, Style};

/// Reader UI color theme
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct StoryTheme {
    // Base colors
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Text colors
    pub title: Color,
    pub story_text: Color,
    pub choice_text: Color,
    pub choice_selected: Color,
    pub consequence: Color,

    // History sidebar
    pub history_text: Color,
    pub history_choice: Color,

    // Accents
    pub end_text: Color,
    pub error_text: Color,
    pub system_text: Color,
}

impl Default for StoryTheme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Magenta,

            title: Color::White,
            story_text: Color::White,
            choice_text: Color::Cyan,
            choice_selected: Color::LightMagenta,
            consequence: Color::DarkGray,

            history_text: Color::DarkGray,
            history_choice: Color::Cyan,

            end_text: Color::Yellow,
            error_text: Color::Red,
            system_text: Color::DarkGray,
        }
    }
}

impl StoryTheme {
    /// Get style for normal text
    #[allow(dead_code)]
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for screen titles
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    /// Get style for story prose
    pub fn story_style(&self) -> Style {
        Style::default().fg(self.story_text)
    }

    /// Get style for a choice row
    pub fn choice_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.choice_selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.choice_text)
        }
    }

    /// Get style for consequence hints under a choice
    pub fn consequence_style(&self) -> Style {
        Style::default()
            .fg(self.consequence)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for archived segments in the history sidebar
    pub fn history_style(&self) -> Style {
        Style::default().fg(self.history_text)
    }

    /// Get style for the choice annotations in the history sidebar
    pub fn history_choice_style(&self) -> Style {
        Style::default().fg(self.history_choice)
    }

    /// Get style for the end-of-story flourish
    pub fn end_style(&self) -> Style {
        Style::default()
            .fg(self.end_text)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for error text
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error_text)
    }

    /// Get style for the failure banner
    pub fn banner_style(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(self.error_text)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for hints and system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}
