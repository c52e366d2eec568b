//! Headless mode for the story reader.
//!
//! This module provides a simple text-based interface for playing a story
//! without a TUI. It's designed for scripting and automated testing.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use weava_core::{Choice, ReaderSession, StoryCatalog, StoryId, StorySegment};

/// Run the reader in headless mode.
///
/// This provides a simple line-oriented protocol:
/// - A bare number takes that choice from the current segment
/// - Lines starting with `#` are commands (open, choices, history, ...)
/// - All output is tagged ([STORY], [CHOICES], [ERROR], ...)
pub fn run_headless(catalog: Arc<StoryCatalog>, story: Option<StoryId>) {
    let mut session = ReaderSession::new(Arc::clone(&catalog));

    println!("=== Weava Headless Mode ===");
    println!();
    println!("Stories:");
    for meta in catalog.stories() {
        println!(
            "  {} - {} ({}, {})",
            meta.id, meta.title, meta.genre, meta.estimated_time
        );
    }
    println!();
    println!("Commands:");
    println!("  #open <id> - Open a story");
    println!("  #choices   - Show the current choices");
    println!("  #history   - Show the path taken so far");
    println!("  #restart   - Restart the open story");
    println!("  #stories   - List available stories");
    println!("  #status    - Show session status");
    println!("  #quit      - Exit");
    println!("  #help      - Show this help");
    println!();
    println!("Enter a choice number (one per line):");
    println!();

    if let Some(id) = story {
        open_story(&mut session, &id);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Handle commands
        if line.starts_with('#') {
            let parts: Vec<&str> = line[1..].split_whitespace().collect();
            match parts.first().copied() {
                Some("quit") | Some("exit") => {
                    println!("Goodbye!");
                    break;
                }
                Some("open") => {
                    if let Some(id) = parts.get(1) {
                        open_story(&mut session, &StoryId::new(*id));
                    } else {
                        println!("[ERROR] Usage: #open <id>");
                    }
                }
                Some("choices") => match session.current_segment() {
                    Some(segment) if !segment.is_terminal() => print_choices(segment),
                    Some(_) => println!("[THE END]"),
                    None => println!("[ERROR] No story is open. Use #open <id> first."),
                },
                Some("history") => print_history(&session),
                Some("restart") => match session.restart() {
                    Ok(()) => {
                        if let Some(segment) = session.current_segment() {
                            print_segment(segment);
                        }
                    }
                    Err(e) => println!("[ERROR] {e}"),
                },
                Some("stories") => {
                    println!("[STORIES]");
                    for meta in catalog.stories() {
                        println!(
                            "  {} - {} ({}, {})",
                            meta.id, meta.title, meta.genre, meta.estimated_time
                        );
                    }
                }
                Some("status") => print_status(&session),
                Some("help") => {
                    println!("[HELP]");
                    println!("  #open <id> - Open a story");
                    println!("  #choices   - Show the current choices");
                    println!("  #history   - Show the path taken so far");
                    println!("  #restart   - Restart the open story");
                    println!("  #stories   - List available stories");
                    println!("  #status    - Show session status");
                    println!("  #quit      - Exit");
                    println!("  #help      - Show this help");
                    println!("  (a bare number takes that choice)");
                }
                _ => {
                    println!("[ERROR] Unknown command. Type #help for help.");
                }
            }
            stdout.flush().ok();
            continue;
        }

        take_choice(&mut session, line);
        stdout.flush().ok();
    }
}

fn open_story(session: &mut ReaderSession, id: &StoryId) {
    match session.initialize(id) {
        Ok(()) => {
            if let Some(meta) = session.metadata() {
                println!("[OPENED] {} by {}", meta.title, meta.author);
                println!();
            }
            if let Some(segment) = session.current_segment() {
                print_segment(segment);
            }
        }
        Err(e) => println!("[ERROR] {e}"),
    }
}

fn take_choice(session: &mut ReaderSession, input: &str) {
    let Some(segment) = session.current_segment() else {
        println!("[ERROR] No story is open. Use #open <id> first.");
        return;
    };
    if segment.is_terminal() {
        println!("[ERROR] The story has ended. #restart to play again or #open <id> for another.");
        return;
    }

    let choice = match input.parse::<usize>() {
        Ok(n) if (1..=segment.choices.len()).contains(&n) => segment.choices[n - 1].clone(),
        Ok(n) => {
            println!("[ERROR] No choice numbered {n}. Type #choices to see your options.");
            return;
        }
        // Anything that is not a number is taken as a raw choice id. Ids
        // without an authored branch close the story with the generic ending.
        Err(_) => Choice::new(input, input),
    };

    match session.choose(&choice) {
        Ok(segment) => print_segment(&segment),
        Err(e) => println!("[ERROR] {e}"),
    }
}

fn print_segment(segment: &StorySegment) {
    println!("[STORY]");
    for para in segment.text.split("\n\n") {
        println!("{para}");
    }
    println!();

    if segment.is_terminal() {
        println!("[THE END]");
        println!("#restart to play again, #open <id> for another story.");
    } else {
        print_choices(segment);
    }
}

fn print_choices(segment: &StorySegment) {
    println!("[CHOICES]");
    for (i, choice) in segment.choices.iter().enumerate() {
        match &choice.consequence {
            Some(hint) => println!("  {}. {} ({hint})", i + 1, choice.text),
            None => println!("  {}. {}", i + 1, choice.text),
        }
    }
}

fn print_history(session: &ReaderSession) {
    if session.data().is_none() {
        println!("[ERROR] No story is open. Use #open <id> first.");
        return;
    }
    println!("[HISTORY]");
    let history = session.history();
    if history.is_empty() {
        println!("  (no choices yet)");
    }
    for (i, entry) in history.iter().enumerate() {
        println!(
            "  {}. {} -> {}",
            i + 1,
            entry.id,
            entry.choice_made.as_deref().unwrap_or("?")
        );
    }
}

fn print_status(session: &ReaderSession) {
    println!("[STATUS]");
    println!("  State: {}", session.state().label());
    if let Some(meta) = session.metadata() {
        println!("  Story: {} ({})", meta.title, meta.id);
        println!("  History: {}", session.history().len());
        println!("  At end: {}", session.at_end());
    }
    if let Some(message) = session.error_message() {
        println!("  Error: {message}");
    }
}

/// Parse the story to auto-open from command line arguments.
pub fn parse_story_from_args(args: &[String]) -> Option<StoryId> {
    args.iter()
        .position(|arg| arg == "--story")
        .and_then(|i| args.get(i + 1))
        .map(|id| StoryId::new(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_story_from_args() {
        let args = vec!["--headless".to_string(), "--story".to_string(), "2".to_string()];
        assert_eq!(parse_story_from_args(&args), Some(StoryId::new("2")));
    }

    #[test]
    fn test_parse_story_missing_value() {
        let args = vec!["--headless".to_string(), "--story".to_string()];
        assert_eq!(parse_story_from_args(&args), None);
        assert_eq!(parse_story_from_args(&[]), None);
    }
}
