//! Branching story engine with AI-assisted story creation.
//!
//! This crate provides:
//! - An authored story catalog with deterministic choice resolution
//! - Reader sessions that track one play-through at a time
//! - A creation flow that turns a reader's idea into a stored story setup
//! - A directory-backed library of created stories
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use weava_core::{sample_catalog, ReaderSession, StoryId};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Arc::new(sample_catalog());
//!     let mut session = ReaderSession::new(catalog);
//!
//!     session.initialize(&StoryId::new("1"))?;
//!     let opening = session.current_segment().unwrap();
//!     println!("{}", opening.text);
//!
//!     let choice = opening.choices[0].clone();
//!     let next = session.choose(&choice)?;
//!     println!("{}", next.text);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod generate;
pub mod library;
pub mod resolver;
pub mod seed;
pub mod session;
pub mod story;
pub mod studio;
pub mod testing;

// Primary public API
pub use catalog::{sample_catalog, CatalogError, StoryArc, StoryCatalog};
pub use generate::{GeminiStoryGenerator, GenerationError, StoryGenerator, StorySetup};
pub use library::{Genre, LibraryError, Perspective, RecordDraft, StoryLibrary, StoryRecord, Tone};
pub use resolver::{fallback_segment, resolve};
pub use seed::{validate_seed, FieldError, StorySeed, Validated};
pub use session::{ReaderSession, SessionError, SessionState};
pub use story::{Choice, ChoiceId, StoryData, StoryId, StoryMetadata, StorySegment};
pub use studio::{StoryStudio, StudioError};
pub use testing::{ReaderHarness, ScriptedGenerator};
