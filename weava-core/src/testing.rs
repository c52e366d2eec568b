//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - `ScriptedGenerator` for deterministic creation tests without API calls
//! - `tiny_catalog` for a minimal authored story graph
//! - `ReaderHarness` for scripted play-throughs
//! - Assertion helpers for verifying session state

use crate::catalog::{StoryArc, StoryCatalog};
use crate::generate::{GenerationError, StoryGenerator, StorySetup};
use crate::seed::StorySeed;
use crate::session::{ReaderSession, SessionError};
use crate::story::{Choice, ChoiceId, StoryId, StoryMetadata, StorySegment};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::Mutex;

// ============================================================================
// Scripted Generator
// ============================================================================

/// A generator that returns scripted outcomes in order.
///
/// Use this for deterministic creation tests without API calls.
pub struct ScriptedGenerator {
    inner: Mutex<ScriptedInner>,
}

struct ScriptedInner {
    outcomes: Vec<ScriptedOutcome>,
    next: usize,
    calls: usize,
}

#[derive(Debug, Clone)]
enum ScriptedOutcome {
    Setup(StorySetup),
    Failure(String),
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ScriptedInner {
                outcomes: Vec::new(),
                next: 0,
                calls: 0,
            }),
        }
    }

    /// Script a successful setup.
    pub fn with_setup(self, title: impl Into<String>, synopsis: impl Into<String>) -> Self {
        self.queue_setup(title, synopsis);
        self
    }

    /// Script a failed generation.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.queue_failure(message);
        self
    }

    pub fn queue_setup(&self, title: impl Into<String>, synopsis: impl Into<String>) {
        let mut inner = self.inner.lock().expect("scripted generator poisoned");
        inner.outcomes.push(ScriptedOutcome::Setup(StorySetup {
            title: title.into(),
            synopsis: synopsis.into(),
        }));
    }

    pub fn queue_failure(&self, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("scripted generator poisoned");
        inner.outcomes.push(ScriptedOutcome::Failure(message.into()));
    }

    /// How many times the generator has been invoked.
    pub fn calls(&self) -> usize {
        self.inner.lock().expect("scripted generator poisoned").calls
    }

    fn next_outcome(&self) -> ScriptedOutcome {
        let mut inner = self.inner.lock().expect("scripted generator poisoned");
        inner.calls += 1;
        let outcome = if inner.next < inner.outcomes.len() {
            inner.outcomes[inner.next].clone()
        } else {
            ScriptedOutcome::Setup(StorySetup {
                title: "An Untold Story".to_string(),
                synopsis: "The scripted generator has no more setups.".to_string(),
            })
        };
        inner.next += 1;
        outcome
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryGenerator for ScriptedGenerator {
    fn generate_setup<'a>(
        &'a self,
        _seed: &'a StorySeed,
    ) -> BoxFuture<'a, Result<StorySetup, GenerationError>> {
        Box::pin(async move {
            match self.next_outcome() {
                ScriptedOutcome::Setup(setup) => Ok(setup),
                ScriptedOutcome::Failure(message) => Err(GenerationError::Api(
                    gemini::Error::Api {
                        status: 503,
                        message,
                    },
                )),
            }
        })
    }
}

// ============================================================================
// Tiny Catalog
// ============================================================================

/// A minimal authored story for exercising the engine.
///
/// Story `trail` opens at a fork offering `left` and `right`. Only `left`
/// has an authored continuation, which in turn offers `deeper` ending the
/// story. `right` falls through to the generic closing segment.
pub fn tiny_catalog() -> StoryCatalog {
    let metadata = StoryMetadata {
        id: StoryId::new("trail"),
        title: "The Trail".to_string(),
        author: "Test".to_string(),
        genre: "Test".to_string(),
        estimated_time: "1 min".to_string(),
        description: "A short walk with one authored branch.".to_string(),
    };
    let opening = StorySegment::new("start", "A fork in the trail.").with_choices(vec![
        Choice::new("left", "Go left"),
        Choice::new("right", "Go right"),
    ]);
    let arc = StoryArc::new(metadata, opening)
        .with_branch(
            "left",
            StorySegment::new("left", "The left path narrows.")
                .with_choices(vec![Choice::new("deeper", "Keep going")]),
        )
        .with_branch("deeper", StorySegment::ending("deeper", "You reach the summit."));

    StoryCatalog::builder().story(arc).build()
}

// ============================================================================
// Reader Harness
// ============================================================================

/// Harness for scripted play-throughs.
pub struct ReaderHarness {
    /// The session under test.
    pub session: ReaderSession,
}

impl ReaderHarness {
    /// Create a harness over the tiny catalog.
    pub fn new() -> Self {
        Self::with_catalog(tiny_catalog())
    }

    /// Create a harness over the built-in sample catalog.
    pub fn sample() -> Self {
        Self::with_catalog(crate::catalog::sample_catalog())
    }

    pub fn with_catalog(catalog: StoryCatalog) -> Self {
        Self {
            session: ReaderSession::new(Arc::new(catalog)),
        }
    }

    pub fn open(&mut self, story: &str) -> Result<(), SessionError> {
        self.session.initialize(&StoryId::new(story))
    }

    /// Take a choice the current segment actually offers.
    ///
    /// Panics if the choice is not offered; that is a scripting mistake in
    /// the test, not an engine outcome.
    pub fn choose_offered(&mut self, choice: &str) -> Result<StorySegment, SessionError> {
        let choice = self
            .session
            .current_segment()
            .and_then(|s| s.choice(&ChoiceId::new(choice)))
            .cloned()
            .unwrap_or_else(|| panic!("choice '{choice}' is not offered by the current segment"));
        self.session.choose(&choice)
    }

    /// Take a choice by raw id, offered or not. Useful for driving the
    /// unmapped-choice fallback.
    pub fn choose_raw(&mut self, choice: &str) -> Result<StorySegment, SessionError> {
        self.session.choose(&Choice::new(choice, choice))
    }

    pub fn current_id(&self) -> Option<&str> {
        self.session.current_segment().map(|s| s.id.as_str())
    }

    pub fn history_len(&self) -> usize {
        self.session.history().len()
    }
}

impl Default for ReaderHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the segment currently on screen.
#[track_caller]
pub fn assert_current_segment(harness: &ReaderHarness, id: &str) {
    let actual = harness.current_id();
    assert_eq!(
        actual,
        Some(id),
        "Expected current segment '{id}', got {actual:?}"
    );
}

/// Assert how many segments the history holds.
#[track_caller]
pub fn assert_history_len(harness: &ReaderHarness, expected: usize) {
    let actual = harness.history_len();
    assert_eq!(
        actual, expected,
        "Expected history of {expected} segments, got {actual}"
    );
}

/// Assert the choice annotation on one history entry.
#[track_caller]
pub fn assert_choice_made(harness: &ReaderHarness, index: usize, text: &str) {
    let actual = harness
        .session
        .history()
        .get(index)
        .and_then(|s| s.choice_made.as_deref());
    assert_eq!(
        actual,
        Some(text),
        "Expected history entry {index} to record choice '{text}', got {actual:?}"
    );
}

/// Assert the play-through has reached an ending.
#[track_caller]
pub fn assert_at_end(harness: &ReaderHarness) {
    assert!(
        harness.session.at_end(),
        "Expected the play-through to be at an ending"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::validate_seed;

    #[test]
    fn test_tiny_catalog_shape() {
        let catalog = tiny_catalog();
        assert_eq!(catalog.len(), 1);
        let data = catalog.lookup_initial(&StoryId::new("trail")).unwrap();
        assert_eq!(data.current_segment.choices.len(), 2);
        assert!(catalog
            .lookup_next(&StoryId::new("trail"), &ChoiceId::new("right"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_harness_walk() {
        let mut harness = ReaderHarness::new();
        harness.open("trail").unwrap();
        assert_current_segment(&harness, "start");

        harness.choose_offered("left").unwrap();
        assert_current_segment(&harness, "left");
        assert_history_len(&harness, 1);
        assert_choice_made(&harness, 0, "Go left");

        harness.choose_offered("deeper").unwrap();
        assert_at_end(&harness);
    }

    #[tokio::test]
    async fn test_scripted_generator_order() {
        let generator = ScriptedGenerator::new()
            .with_setup("First", "First synopsis.")
            .with_setup("Second", "Second synopsis.");
        let seed = validate_seed("a seed idea here").into_result().unwrap();

        assert_eq!(generator.generate_setup(&seed).await.unwrap().title, "First");
        assert_eq!(generator.generate_setup(&seed).await.unwrap().title, "Second");
        assert_eq!(generator.calls(), 2);

        // After scripted outcomes are exhausted, get the default.
        let fallback = generator.generate_setup(&seed).await.unwrap();
        assert_eq!(fallback.title, "An Untold Story");
    }

    #[tokio::test]
    async fn test_scripted_generator_failure() {
        let generator = ScriptedGenerator::new().with_failure("model unavailable");
        let seed = validate_seed("a seed idea here").into_result().unwrap();

        let err = generator.generate_setup(&seed).await.unwrap_err();
        assert!(matches!(err, GenerationError::Api(_)));
        assert!(err.to_string().contains("model unavailable"));
    }
}
