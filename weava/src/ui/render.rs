//! Render orchestration for the story reader TUI

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use weava_core::StoryRecord;

use crate::app::{App, PickerEntry, Screen};
use crate::ui::layout::{centered_rect_fixed, PickerLayout, ReaderLayout, RecordLayout};
use crate::ui::widgets::history::snippet;
use crate::ui::widgets::{ChoiceListWidget, HistoryWidget, SeedInputWidget, SegmentWidget};

/// Overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    Create,
}

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

fn spinner_char(frame: u8) -> char {
    SPINNER[frame as usize % SPINNER.len()]
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    match app.screen {
        Screen::Picker => render_picker(frame, app, area),
        Screen::Reader => render_reader(frame, app, area),
        Screen::Record => render_record(frame, app, area),
    }

    // Render overlay if present
    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, *overlay, area);
    }
}

// ----------------------------------------------------------------------
// Picker
// ----------------------------------------------------------------------

fn render_picker(frame: &mut Frame, app: &App, area: Rect) {
    let layout = PickerLayout::calculate(area);

    let title = Line::from(Span::styled(
        " Weava · choose a story ",
        app.theme.title_style(),
    ));
    frame.render_widget(Paragraph::new(title), layout.title_area);

    let items: Vec<ListItem> = app
        .picker_entries
        .iter()
        .map(|entry| picker_item(app, entry))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Stories ")
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(true)),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.choice_selected)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(app.picker_index));
    frame.render_stateful_widget(list, layout.list_area, &mut state);

    render_status(
        frame,
        app,
        "Enter open · j/k move · c new story · r refresh · ? help · q quit",
        layout.status_area,
    );
}

fn picker_item<'a>(app: &App, entry: &'a PickerEntry) -> ListItem<'a> {
    let lines = match entry {
        PickerEntry::Catalog(meta) => vec![
            Line::from(vec![
                Span::styled(
                    meta.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{} · {}", meta.genre, meta.estimated_time),
                    app.theme.system_style(),
                ),
            ]),
            Line::from(Span::styled(
                format!("  {}", meta.description),
                app.theme.system_style(),
            )),
        ],
        PickerEntry::Record(record) => vec![
            Line::from(vec![
                Span::styled(
                    record.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!(
                        "{} · {} · yours",
                        record.genre.label(),
                        record.tone.label()
                    ),
                    app.theme.system_style(),
                ),
            ]),
            Line::from(Span::styled(
                format!("  {}", snippet(&record.synopsis, 70)),
                app.theme.system_style(),
            )),
        ],
    };
    ListItem::new(lines)
}

// ----------------------------------------------------------------------
// Reader
// ----------------------------------------------------------------------

fn render_reader(frame: &mut Frame, app: &App, area: Rect) {
    let Some(data) = app.session.data() else {
        // Nothing survived the failure: a full-screen error with retry.
        if let Some(message) = app.session.error_message() {
            render_reader_failure(frame, app, message, area);
        }
        return;
    };

    let segment = &data.current_segment;
    let busy = app.session.is_busy();
    let error = app.session.error_message();
    let at_end = segment.is_terminal();

    let panel_rows: u16 = if busy {
        3
    } else if at_end {
        4
    } else {
        let rows: usize = segment
            .choices
            .iter()
            .map(|c| if c.consequence.is_some() { 2 } else { 1 })
            .sum();
        (rows as u16 + 2).min(12)
    };

    let layout = ReaderLayout::calculate(area, app.show_history, error.is_some(), panel_rows);

    // Title bar
    let meta = &data.metadata;
    let title = format!(
        " {} · by {} · {} · {} ",
        meta.title, meta.author, meta.genre, meta.estimated_time
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(title, app.theme.title_style()))),
        layout.title_area,
    );

    // Failure banner with retry/dismiss affordances
    if let (Some(banner), Some(message)) = (layout.banner_area, error) {
        let text = format!(" {message}  ·  r retry · d dismiss ");
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, app.theme.banner_style()))),
            banner,
        );
    }

    frame.render_widget(
        SegmentWidget::new(segment, &app.theme).scroll(app.segment_scroll),
        layout.segment_area,
    );

    if busy {
        render_thinking_panel(frame, app, layout.panel_area);
    } else if at_end {
        render_end_panel(frame, app, layout.panel_area);
    } else {
        frame.render_widget(
            ChoiceListWidget::new(&segment.choices, &app.theme).selected(app.choice_index),
            layout.panel_area,
        );
    }

    if let Some(history_area) = layout.history_area {
        frame.render_widget(
            HistoryWidget::new(app.session.history(), &app.theme),
            history_area,
        );
    }

    let hints = if at_end {
        "r play again · Esc back to stories · h path · q quit"
    } else {
        "1-9 or j/k + Enter choose · h path · r restart · Esc back · ? help"
    };
    render_status(frame, app, hints, layout.status_area);
}

fn render_thinking_panel(frame: &mut Frame, app: &App, area: Rect) {
    let spin = spinner_char(app.animation_frame);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false));
    let line = Line::from(Span::styled(
        format!(" {spin} Weaving the next part of your story..."),
        app.theme.system_style(),
    ));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_end_panel(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    let lines = vec![
        Line::from(Span::styled("The End", app.theme.end_style())),
        Line::from(Span::styled(
            "r play again · Esc back to stories",
            app.theme.system_style(),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

/// Full-screen failure, shown when a story could not be opened at all.
fn render_reader_failure(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let popup = centered_rect_fixed(56, 9, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Something went wrong ")
        .borders(Borders::ALL)
        .border_style(app.theme.error_style());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), app.theme.error_style())),
        Line::from(""),
        Line::from(Span::styled(
            "r try again · Esc back to stories",
            app.theme.system_style(),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(block),
        popup,
    );
}

// ----------------------------------------------------------------------
// Record view
// ----------------------------------------------------------------------

fn render_record(frame: &mut Frame, app: &App, area: Rect) {
    let layout = RecordLayout::calculate(area);

    let Some(record) = app.record.as_ref() else {
        render_status(frame, app, "Esc back", layout.status_area);
        return;
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", record.title),
            app.theme.title_style(),
        ))),
        layout.title_area,
    );

    let block = Block::default()
        .title(" Your Story ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(record_lines(app, record))
            .scroll((app.record_scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .block(block),
        layout.body_area,
    );

    render_status(frame, app, "j/k scroll · Esc back · q quit", layout.status_area);
}

fn record_lines<'a>(app: &App, record: &'a StoryRecord) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{} · {} · {}",
                record.genre.label(),
                record.tone.label(),
                record.perspective.label()
            ),
            app.theme.system_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("From your idea:", app.theme.system_style())),
        Line::from(Span::styled(
            format!("\"{}\"", record.seed),
            app.theme.consequence_style(),
        )),
        Line::from(""),
    ];

    for line in record.synopsis.lines() {
        lines.push(Line::from(Span::styled(
            line.to_string(),
            app.theme.story_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Chapters are coming soon. Check back to read this story.",
        app.theme.system_style(),
    )));
    lines
}

// ----------------------------------------------------------------------
// Status line
// ----------------------------------------------------------------------

fn render_status(frame: &mut Frame, app: &App, hints: &str, area: Rect) {
    let text = match app.status_message() {
        Some(message) => format!(" {message} "),
        None => format!(" {hints} "),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, app.theme.system_style()))),
        area,
    );
}

// ----------------------------------------------------------------------
// Overlays
// ----------------------------------------------------------------------

fn render_overlay(frame: &mut Frame, app: &App, overlay: Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
        Overlay::Create => render_create_overlay(frame, app, area),
    }
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(48, 24, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            " Weava - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Picker:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  j/k or ↑/↓    Move selection"),
        Line::from("  Enter         Open story"),
        Line::from("  c             New story from your idea"),
        Line::from("  r             Refresh your stories"),
        Line::from(""),
        Line::from(Span::styled(
            "Reader:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  j/k           Select a choice"),
        Line::from("  1-9           Take a choice directly"),
        Line::from("  Enter         Confirm selected choice"),
        Line::from("  h             Toggle the path sidebar"),
        Line::from("  r             Restart the story"),
        Line::from("  PgUp/PgDn     Scroll the story text"),
        Line::from("  Esc           Back to the picker"),
        Line::from(""),
        Line::from(Span::styled(
            "When something fails:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  r retry · d dismiss"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Render the create overlay
fn render_create_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(62, 14, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" New Story ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Describe your story idea and we'll set the scene.",
            app.theme.system_style(),
        ))),
        rows[0],
    );

    frame.render_widget(
        SeedInputWidget::new(app.seed(), &app.theme)
            .cursor_position(app.seed_cursor())
            .active(!app.creating),
        rows[1],
    );

    let mut messages: Vec<Line> = Vec::new();
    if app.creating {
        let spin = spinner_char(app.animation_frame);
        messages.push(Line::from(Span::styled(
            format!("{spin} Weaving your story..."),
            app.theme.system_style(),
        )));
    }
    for err in &app.seed_errors {
        messages.push(Line::from(Span::styled(
            err.message.clone(),
            app.theme.error_style(),
        )));
    }
    if let Some(message) = &app.create_error {
        messages.push(Line::from(Span::styled(
            message.clone(),
            app.theme.error_style(),
        )));
        messages.push(Line::from(Span::styled(
            "Press Enter to try again.",
            app.theme.system_style(),
        )));
    }
    frame.render_widget(
        Paragraph::new(messages).wrap(Wrap { trim: false }),
        rows[2],
    );

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " Enter create · Esc cancel ",
            app.theme.system_style(),
        ))),
        rows[3],
    );
}
