//! The story studio: validate, generate, persist.
//!
//! [`StoryStudio`] owns the whole creation flow. The three stages run in
//! order and the flow aborts at the first failure, so a record only ever
//! exists once validation and generation have both succeeded. There are no
//! partial records to clean up.

use crate::generate::{GenerationError, StoryGenerator};
use crate::library::{LibraryError, RecordDraft, StoryLibrary, StoryRecord};
use crate::seed::{validate_seed, FieldError, Validated};
use thiserror::Error;

/// Errors from the creation flow, one per stage.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Story idea failed validation")]
    Validation(Vec<FieldError>),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),
}

/// Creates stories from reader ideas.
pub struct StoryStudio<G: StoryGenerator> {
    generator: G,
    library: StoryLibrary,
}

impl<G: StoryGenerator> StoryStudio<G> {
    pub fn new(generator: G, library: StoryLibrary) -> Self {
        Self { generator, library }
    }

    pub fn library(&self) -> &StoryLibrary {
        &self.library
    }

    /// Run the full creation flow on raw form input.
    ///
    /// Style configuration falls back to the platform defaults; the record
    /// keeps whatever the reader typed as its seed, trimmed.
    pub async fn create_from_seed(&self, input: &str) -> Result<StoryRecord, StudioError> {
        let seed = match validate_seed(input) {
            Validated::Valid(seed) => seed,
            Validated::Invalid(errors) => {
                tracing::debug!(count = errors.len(), "seed rejected");
                return Err(StudioError::Validation(errors));
            }
        };

        let setup = self.generator.generate_setup(&seed).await?;

        let record = self
            .library
            .create(RecordDraft::new(seed.into_inner(), setup.title, setup.synopsis))
            .await?;
        tracing::info!(story_id = %record.id, title = %record.title, "story created");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Genre, Perspective, Tone};
    use crate::testing::ScriptedGenerator;
    use tempfile::TempDir;

    fn studio_in(dir: &TempDir, generator: ScriptedGenerator) -> StoryStudio<ScriptedGenerator> {
        StoryStudio::new(generator, StoryLibrary::new(dir.path()))
    }

    #[tokio::test]
    async fn test_create_from_seed_persists_record() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let generator = ScriptedGenerator::new()
            .with_setup("The Dawn Detective", "A detective who only works at dawn.");
        let studio = studio_in(&dir, generator);

        let record = studio
            .create_from_seed("  A detective who only works at dawn  ")
            .await
            .expect("Create should succeed");

        assert_eq!(record.title, "The Dawn Detective");
        assert_eq!(record.seed, "A detective who only works at dawn");
        assert_eq!(record.genre, Genre::Fantasy);
        assert_eq!(record.tone, Tone::Adventurous);
        assert_eq!(record.perspective, Perspective::ThirdPerson);

        let listed = studio.library().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, record.id);
    }

    #[tokio::test]
    async fn test_invalid_seed_never_reaches_generator() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let generator = ScriptedGenerator::new();
        let studio = studio_in(&dir, generator);

        let err = studio.create_from_seed("too short").await.unwrap_err();
        match err {
            StudioError::Validation(errors) => {
                assert_eq!(errors[0].message, "Your idea is too short! Tell us more.");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        // Nothing was generated or persisted.
        assert_eq!(studio.generator.calls(), 0);
        assert!(studio.library().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_no_record() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let generator = ScriptedGenerator::new().with_failure("model unavailable");
        let studio = studio_in(&dir, generator);

        let err = studio
            .create_from_seed("A lighthouse keeper who talks to storms")
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Generation(_)));
        assert!(studio.library().list().await.unwrap().is_empty());
    }
}
