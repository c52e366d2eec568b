//! Weava interactive story reader TUI.
//!
//! A terminal interface for reading branching stories and creating new
//! ones from a one-line idea.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a text-based interface suitable for automated testing:
//!
//! ```bash
//! cargo run -p weava -- --headless --story 1
//! ```

mod app;
mod events;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use weava_core::{sample_catalog, GeminiStoryGenerator, StoryLibrary, StoryStudio};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Pause between the two legs of a choice, so fast transitions still read
/// as transitions.
const CHOICE_PAUSE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let catalog = Arc::new(sample_catalog());

    // Check for --headless mode
    if args.iter().any(|a| a == "--headless") {
        init_logging();
        let story = headless::parse_story_from_args(&args);
        headless::run_headless(catalog, story);
        return Ok(());
    }

    // No logging subscriber in TUI mode: stderr would draw over the
    // alternate screen.
    let library = StoryLibrary::new(library_dir());
    let studio = GeminiStoryGenerator::from_env()
        .ok()
        .map(|generator| StoryStudio::new(generator, library.clone()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(catalog, library, studio)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Reload the saved-story rows when something changed them
        if app.pending_refresh {
            app.pending_refresh = false;
            match app.library.list().await {
                Ok(records) => app.set_records(records),
                Err(e) => app.set_status(format!("Could not load your stories: {e}")),
            }
        }

        // Process a queued choice in two legs so the busy frame is visible
        if let Some(choice) = app.pending_choice.take() {
            if app.start_choice(choice) {
                terminal.draw(|f| render(f, &app))?;
                tokio::time::sleep(CHOICE_PAUSE).await;
                app.complete_choice();
            }
        }

        // Process a submitted story idea
        if let Some(seed) = app.pending_create.take() {
            terminal.draw(|f| render(f, &app))?;
            let result = match app.studio.as_ref() {
                Some(studio) => Some(studio.create_from_seed(&seed).await),
                None => None,
            };
            match result {
                Some(result) => app.finish_create(result),
                None => {
                    app.creating = false;
                    app.set_status("Set GEMINI_API_KEY to create stories");
                }
            }
        }

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        } else {
            // Tick animations
            app.tick();
        }
    }
}

/// Where created stories are stored: `WEAVA_LIBRARY_DIR` if set, otherwise
/// `~/.weava/stories`, otherwise a `stories` directory next to the binary.
fn library_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WEAVA_LIBRARY_DIR") {
        return PathBuf::from(dir);
    }
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".weava").join("stories"),
        Err(_) => PathBuf::from("stories"),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("Weava - interactive branching stories");
    println!();
    println!("USAGE:");
    println!("  weava [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help   Show this help message");
    println!("  --headless   Run in headless mode (text-only, no TUI)");
    println!();
    println!("HEADLESS OPTIONS (only with --headless):");
    println!("  --story <ID>   Open this story immediately");
    println!();
    println!("ENVIRONMENT:");
    println!("  GEMINI_API_KEY      Enables creating stories from your own ideas");
    println!("  WEAVA_LIBRARY_DIR   Where created stories are stored");
    println!();
    println!("EXAMPLES:");
    println!("  weava                          # Interactive TUI mode");
    println!("  weava --headless               # Headless, pick a story with #open");
    println!("  weava --headless --story 1     # Jump straight into story 1");
}
