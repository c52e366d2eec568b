//! Main application state and logic

use std::sync::Arc;

use weava_core::{
    Choice, FieldError, GeminiStoryGenerator, ReaderSession, SessionState, StoryCatalog, StoryId,
    StoryLibrary, StoryMetadata, StoryRecord, StorySegment, StoryStudio, StudioError,
};

use crate::ui::theme::StoryTheme;
use crate::ui::Overlay;

/// Which screen fills the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Story picker - authored stories plus the reader's own
    #[default]
    Picker,
    /// The branching reader
    Reader,
    /// A created story's record (title, synopsis, style)
    Record,
}

/// One row in the picker list
#[derive(Debug, Clone)]
pub enum PickerEntry {
    Catalog(StoryMetadata),
    Record(StoryRecord),
}

/// Main application state
pub struct App {
    // Engine handles
    pub catalog: Arc<StoryCatalog>,
    pub session: ReaderSession,
    pub library: StoryLibrary,
    pub studio: Option<StoryStudio<GeminiStoryGenerator>>,

    // UI state
    pub screen: Screen,
    overlay: Option<Overlay>,
    pub theme: StoryTheme,

    // Picker
    pub picker_entries: Vec<PickerEntry>,
    pub picker_index: usize,
    records: Vec<StoryRecord>,

    // Reader
    pub choice_index: usize,
    pub segment_scroll: usize,
    pub show_history: bool,
    last_choice: Option<Choice>,
    last_opened: Option<StoryId>,

    // Record view
    pub record: Option<StoryRecord>,
    pub record_scroll: usize,

    // Create overlay
    seed_buffer: String,
    seed_cursor: usize,
    pub seed_errors: Vec<FieldError>,
    pub create_error: Option<String>,
    pub creating: bool,

    // Work queued for the main loop
    pub pending_choice: Option<Choice>,
    pub pending_create: Option<String>,
    pub pending_refresh: bool,

    // Status
    status_message: Option<String>,
    pub animation_frame: u8,
}

impl App {
    pub fn new(
        catalog: Arc<StoryCatalog>,
        library: StoryLibrary,
        studio: Option<StoryStudio<GeminiStoryGenerator>>,
    ) -> Self {
        let session = ReaderSession::new(Arc::clone(&catalog));

        let mut app = Self {
            catalog,
            session,
            library,
            studio,
            screen: Screen::Picker,
            overlay: None,
            theme: StoryTheme::default(),
            picker_entries: Vec::new(),
            picker_index: 0,
            records: Vec::new(),
            choice_index: 0,
            segment_scroll: 0,
            show_history: true,
            last_choice: None,
            last_opened: None,
            record: None,
            record_scroll: 0,
            seed_buffer: String::new(),
            seed_cursor: 0,
            seed_errors: Vec::new(),
            create_error: None,
            creating: false,
            pending_choice: None,
            pending_create: None,
            pending_refresh: true,
            status_message: None,
            animation_frame: 0,
        };

        app.rebuild_picker();
        if app.studio.is_none() {
            app.set_status("Reading only: set GEMINI_API_KEY to create stories");
        }
        app
    }

    // ------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn open_help(&mut self) {
        self.overlay = Some(Overlay::Help);
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Open the create overlay, or explain why it is unavailable.
    pub fn open_create(&mut self) {
        if self.studio.is_none() {
            self.set_status("Set GEMINI_API_KEY to create stories");
            return;
        }
        self.seed_errors.clear();
        self.create_error = None;
        self.overlay = Some(Overlay::Create);
    }

    // ------------------------------------------------------------------
    // Picker
    // ------------------------------------------------------------------

    /// Replace the saved-story rows and rebuild the list.
    pub fn set_records(&mut self, records: Vec<StoryRecord>) {
        self.records = records;
        self.rebuild_picker();
    }

    fn rebuild_picker(&mut self) {
        self.picker_entries = self
            .catalog
            .stories()
            .into_iter()
            .cloned()
            .map(PickerEntry::Catalog)
            .chain(self.records.iter().cloned().map(PickerEntry::Record))
            .collect();
        if self.picker_index >= self.picker_entries.len() {
            self.picker_index = self.picker_entries.len().saturating_sub(1);
        }
    }

    pub fn picker_down(&mut self) {
        if !self.picker_entries.is_empty() {
            self.picker_index = (self.picker_index + 1).min(self.picker_entries.len() - 1);
        }
    }

    pub fn picker_up(&mut self) {
        self.picker_index = self.picker_index.saturating_sub(1);
    }

    /// Open whatever the picker has selected.
    pub fn open_selected(&mut self) {
        match self.picker_entries.get(self.picker_index).cloned() {
            Some(PickerEntry::Catalog(meta)) => self.open_story(&meta.id),
            Some(PickerEntry::Record(record)) => {
                self.record = Some(record);
                self.record_scroll = 0;
                self.screen = Screen::Record;
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------
    // Reader
    // ------------------------------------------------------------------

    pub fn open_story(&mut self, story: &StoryId) {
        self.last_opened = Some(story.clone());
        self.last_choice = None;
        self.choice_index = 0;
        self.segment_scroll = 0;
        self.clear_status();
        self.screen = Screen::Reader;
        if let Err(e) = self.session.initialize(story) {
            self.set_status(format!("{e}"));
        }
    }

    pub fn back_to_picker(&mut self) {
        self.screen = Screen::Picker;
        self.clear_status();
    }

    /// Whether the reader is currently offering choices.
    pub fn choices_shown(&self) -> bool {
        self.session.current_segment().is_some()
            && !self.session.at_end()
            && self.session.error_message().is_none()
    }

    pub fn select_next_choice(&mut self) {
        let len = self
            .session
            .current_segment()
            .map(|s| s.choices.len())
            .unwrap_or(0);
        if len > 0 {
            self.choice_index = (self.choice_index + 1).min(len - 1);
        }
    }

    pub fn select_prev_choice(&mut self) {
        self.choice_index = self.choice_index.saturating_sub(1);
    }

    /// Queue the choice at `index` for the main loop.
    pub fn commit_choice(&mut self, index: usize) {
        if self.session.is_busy() {
            return;
        }
        let choice = self
            .session
            .current_segment()
            .and_then(|s| s.choices.get(index))
            .cloned();
        if let Some(choice) = choice {
            self.choice_index = index;
            self.pending_choice = Some(choice);
        }
    }

    /// First leg of a queued choice. Returns false when the session
    /// refused it, with the refusal already on the status line.
    pub fn start_choice(&mut self, choice: Choice) -> bool {
        match self.session.begin_choice(&choice) {
            Ok(()) => {
                self.last_choice = Some(choice);
                true
            }
            Err(e) => {
                self.set_status(format!("{e}"));
                false
            }
        }
    }

    /// Second leg of a queued choice.
    pub fn complete_choice(&mut self) {
        match self.session.finish_choice() {
            Ok(segment) => self.arrive(&segment),
            Err(e) => self.set_status(format!("{e}")),
        }
    }

    fn arrive(&mut self, segment: &StorySegment) {
        self.choice_index = 0;
        self.segment_scroll = 0;
        if segment.is_terminal() {
            self.set_status("The End");
        } else {
            self.clear_status();
        }
    }

    pub fn restart_story(&mut self) {
        match self.session.restart() {
            Ok(()) => {
                self.choice_index = 0;
                self.segment_scroll = 0;
                self.set_status("Back to the beginning");
            }
            Err(e) => self.set_status(format!("{e}")),
        }
    }

    /// Retry whatever just failed: the last choice when the play-through
    /// survived, otherwise reopening the story.
    pub fn retry_last(&mut self) {
        if self.session.data().is_some() {
            match self.last_choice.clone() {
                Some(choice) => self.pending_choice = Some(choice),
                None => self.session.clear_error(),
            }
        } else if let Some(story) = self.last_opened.clone() {
            self.open_story(&story);
        }
    }

    /// Acknowledge a failure. Falls back to the picker when the session
    /// has nothing left to show.
    pub fn dismiss_error(&mut self) {
        self.session.clear_error();
        if matches!(self.session.state(), SessionState::Idle) {
            self.screen = Screen::Picker;
        }
    }

    // ------------------------------------------------------------------
    // Create overlay input
    // ------------------------------------------------------------------

    pub fn seed(&self) -> &str {
        &self.seed_buffer
    }

    pub fn seed_cursor(&self) -> usize {
        self.seed_cursor
    }

    /// Queue the typed seed for the main loop. The buffer is kept so a
    /// failed attempt can be edited and resubmitted.
    pub fn submit_seed(&mut self) {
        if self.creating {
            return;
        }
        self.seed_errors.clear();
        self.create_error = None;
        self.creating = true;
        self.pending_create = Some(self.seed_buffer.clone());
    }

    /// Absorb the outcome of a create attempt.
    pub fn finish_create(&mut self, result: Result<StoryRecord, StudioError>) {
        self.creating = false;
        match result {
            Ok(record) => {
                self.close_overlay();
                self.seed_buffer.clear();
                self.seed_cursor = 0;
                self.set_status(format!("Created \"{}\"", record.title));
                self.record = Some(record);
                self.record_scroll = 0;
                self.screen = Screen::Record;
                self.pending_refresh = true;
            }
            Err(StudioError::Validation(errors)) => {
                self.seed_errors = errors;
            }
            Err(err) => {
                self.create_error = Some(err.to_string());
            }
        }
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_seed_char(&mut self, c: char) {
        let byte_pos = self
            .seed_buffer
            .char_indices()
            .nth(self.seed_cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.seed_buffer.len());
        self.seed_buffer.insert(byte_pos, c);
        self.seed_cursor += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn seed_backspace(&mut self) {
        if self.seed_cursor > 0 {
            self.seed_cursor -= 1;
            if let Some((byte_pos, ch)) = self.seed_buffer.char_indices().nth(self.seed_cursor) {
                self.seed_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn seed_delete(&mut self) {
        let char_count = self.seed_buffer.chars().count();
        if self.seed_cursor < char_count {
            if let Some((byte_pos, ch)) = self.seed_buffer.char_indices().nth(self.seed_cursor) {
                self.seed_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    pub fn seed_cursor_left(&mut self) {
        self.seed_cursor = self.seed_cursor.saturating_sub(1);
    }

    pub fn seed_cursor_right(&mut self) {
        let char_count = self.seed_buffer.chars().count();
        self.seed_cursor = (self.seed_cursor + 1).min(char_count);
    }

    pub fn seed_cursor_home(&mut self) {
        self.seed_cursor = 0;
    }

    pub fn seed_cursor_end(&mut self) {
        self.seed_cursor = self.seed_buffer.chars().count();
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    pub fn scroll_up(&mut self, lines: usize) {
        match self.screen {
            Screen::Picker => self.picker_up(),
            Screen::Reader => {
                self.segment_scroll = self.segment_scroll.saturating_sub(lines);
            }
            Screen::Record => {
                self.record_scroll = self.record_scroll.saturating_sub(lines);
            }
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        match self.screen {
            Screen::Picker => self.picker_down(),
            Screen::Reader => {
                let max = self
                    .session
                    .current_segment()
                    .map(|s| estimated_text_rows(&s.text))
                    .unwrap_or(0);
                self.segment_scroll = (self.segment_scroll + lines).min(max);
            }
            Screen::Record => {
                // Synopsis plus the fixed chrome lines around it.
                let max = self
                    .record
                    .as_ref()
                    .map(|r| estimated_text_rows(&r.synopsis) + 8)
                    .unwrap_or(0);
                self.record_scroll = (self.record_scroll + lines).min(max);
            }
        }
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }
}

/// Rough line count for `text` once wrapped, for scroll bounds.
fn estimated_text_rows(text: &str) -> usize {
    const ESTIMATED_WIDTH: usize = 60;
    text.lines()
        .map(|line| (line.chars().count() / ESTIMATED_WIDTH).max(1))
        .sum()
}
