//! Event handling for the story reader TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, Screen};
use crate::ui::Overlay;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Handle overlay keys first
    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    // One transition at a time: while a choice is resolving, only quit works.
    if app.session.is_busy() {
        return EventResult::Continue;
    }

    match app.screen {
        Screen::Picker => handle_picker_key(app, key),
        Screen::Reader => handle_reader_key(app, key),
        Screen::Record => handle_record_key(app, key),
    }
}

/// Handle keys on the story picker
fn handle_picker_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.open_help();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.picker_down();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.picker_up();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.open_selected();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('c') => {
            app.open_create();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('r') => {
            app.pending_refresh = true;
            app.set_status("Refreshing your stories...");
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle keys in the reader
fn handle_reader_key(app: &mut App, key: KeyEvent) -> EventResult {
    // Failure keys take precedence so retry and dismiss always work.
    if app.session.error_message().is_some() {
        return handle_reader_error_key(app, key);
    }

    match key.code {
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.open_help();
            EventResult::NeedsRedraw
        }
        KeyCode::Esc => {
            app.back_to_picker();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('h') => {
            app.show_history = !app.show_history;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('r') => {
            app.restart_story();
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(5);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(5);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.choices_shown() {
                app.select_next_choice();
            } else {
                app.scroll_down(1);
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.choices_shown() {
                app.select_prev_choice();
            } else {
                app.scroll_up(1);
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            if app.choices_shown() {
                app.commit_choice(app.choice_index);
            } else if app.session.at_end() {
                app.back_to_picker();
            }
            EventResult::NeedsRedraw
        }
        // Choice selection (1-9 keys)
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10).unwrap() as usize - 1;
            app.commit_choice(index);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle keys while the reader shows a failure
fn handle_reader_error_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Char('r') => {
            app.retry_last();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('d') => {
            app.dismiss_error();
            EventResult::NeedsRedraw
        }
        KeyCode::Esc => {
            app.dismiss_error();
            app.back_to_picker();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle keys in the record view
fn handle_record_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.open_help();
            EventResult::NeedsRedraw
        }
        KeyCode::Esc | KeyCode::Char('b') => {
            app.back_to_picker();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match app.overlay().copied() {
        Some(Overlay::Help) => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                app.close_overlay();
                EventResult::NeedsRedraw
            }
            _ => EventResult::Continue,
        },
        Some(Overlay::Create) => handle_create_key(app, key),
        None => EventResult::Continue,
    }
}

/// Handle keys in the create overlay (free text input)
fn handle_create_key(app: &mut App, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    // Keep the seed untouched while the studio is working on it.
    if app.creating {
        return EventResult::Continue;
    }

    match key.code {
        KeyCode::Esc => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.submit_seed();
            EventResult::NeedsRedraw
        }
        KeyCode::Left => {
            app.seed_cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.seed_cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.seed_cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.seed_cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.seed_backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.seed_delete();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.type_seed_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini::Gemini;
    use std::sync::Arc;
    use weava_core::{
        sample_catalog, Choice, GeminiStoryGenerator, StoryLibrary, StoryStudio,
    };

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn reading_app() -> App {
        let mut app = App::new(
            Arc::new(sample_catalog()),
            StoryLibrary::new("test-stories"),
            None,
        );
        app.open_selected();
        app
    }

    fn creating_app() -> App {
        let library = StoryLibrary::new("test-stories");
        let studio = StoryStudio::new(
            GeminiStoryGenerator::new(Gemini::new("test-key")),
            library.clone(),
        );
        App::new(Arc::new(sample_catalog()), library, Some(studio))
    }

    #[test]
    fn test_q_quits_from_picker() {
        let mut app = App::new(
            Arc::new(sample_catalog()),
            StoryLibrary::new("test-stories"),
            None,
        );
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('q'))), EventResult::Quit);
    }

    #[test]
    fn test_enter_opens_selected_story() {
        let mut app = App::new(
            Arc::new(sample_catalog()),
            StoryLibrary::new("test-stories"),
            None,
        );
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Reader);
        assert_eq!(app.session.state().label(), "ready");
    }

    #[test]
    fn test_digit_commits_choice() {
        let mut app = reading_app();
        handle_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(
            app.pending_choice.as_ref().map(|c| c.id.as_str()),
            Some("sunny_path")
        );
    }

    #[test]
    fn test_enter_commits_selected_choice() {
        let mut app = reading_app();
        handle_event(&mut app, key(KeyCode::Char('j')));
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.pending_choice.as_ref().map(|c| c.id.as_str()),
            Some("sunny_path")
        );
    }

    #[test]
    fn test_reader_keys_ignored_while_busy() {
        let mut app = reading_app();
        let choice = Choice::new("dark_path", "Follow the mysterious lights into the dark woods");
        assert!(app.start_choice(choice));
        assert!(app.session.is_busy());

        assert_eq!(handle_event(&mut app, key(KeyCode::Char('1'))), EventResult::Continue);
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('r'))), EventResult::Continue);
        assert!(app.pending_choice.is_none());

        // The in-flight transition is untouched by the rejected keys.
        app.complete_choice();
        assert_eq!(
            app.session.current_segment().map(|s| s.id.as_str()),
            Some("dark_path")
        );
    }

    #[test]
    fn test_h_toggles_history_sidebar() {
        let mut app = reading_app();
        let before = app.show_history;
        handle_event(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.show_history, !before);
    }

    #[test]
    fn test_esc_returns_to_picker() {
        let mut app = reading_app();
        handle_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Picker);
    }

    #[test]
    fn test_help_overlay_opens_and_closes() {
        let mut app = reading_app();
        handle_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.has_overlay());

        // Keys other than the close keys are swallowed by the overlay.
        handle_event(&mut app, key(KeyCode::Char('1')));
        assert!(app.pending_choice.is_none());

        handle_event(&mut app, key(KeyCode::Esc));
        assert!(!app.has_overlay());
    }

    #[test]
    fn test_create_overlay_typing_and_submit() {
        let mut app = creating_app();
        handle_event(&mut app, key(KeyCode::Char('c')));
        assert!(app.has_overlay());

        for c in "A detective who only works at dawn".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.seed(), "A detective who only works at dawn");

        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.creating);
        assert_eq!(
            app.pending_create.as_deref(),
            Some("A detective who only works at dawn")
        );

        // Further typing is ignored until the attempt settles.
        handle_event(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.seed(), "A detective who only works at dawn");
    }

    #[test]
    fn test_ctrl_c_quits_even_inside_create_overlay() {
        let mut app = creating_app();
        handle_event(&mut app, key(KeyCode::Char('c')));
        assert!(app.has_overlay());

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(handle_event(&mut app, ctrl_c), EventResult::Quit);
    }

    #[test]
    fn test_error_dismiss_without_data_returns_to_picker() {
        let mut app = reading_app();
        app.open_story(&weava_core::StoryId::new("nonexistent"));
        assert!(app.session.error_message().is_some());

        handle_event(&mut app, key(KeyCode::Char('d')));
        assert!(app.session.error_message().is_none());
        assert_eq!(app.screen, Screen::Picker);
    }
}
