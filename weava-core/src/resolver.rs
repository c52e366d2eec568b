//! Choice resolution.
//!
//! Maps a `(story, choice)` pair to the next segment of the play-through.
//! The two failure modes are deliberately asymmetric: an unknown story is an
//! error the caller must handle, while a known story with no authored
//! continuation for the chosen branch resolves to a generic closing segment.
//! Readers always reach an ending; they never see a dead end inside a story
//! that exists.

use crate::catalog::{CatalogError, StoryCatalog};
use crate::story::{ChoiceId, StoryId, StorySegment};

/// Segment id used when a choice has no authored continuation.
pub const GENERIC_END_ID: &str = "generic_end";

const GENERIC_END_TEXT: &str = "Your journey through this story has come to an end. The choices you made have led you to this moment, and while every path is different, each one teaches us something valuable about ourselves and the world around us.\n\nThank you for experiencing this interactive tale. Your decisions shaped not just the story, but perhaps your own understanding of the themes and challenges presented along the way.";

/// Resolve a choice within a story to the segment it leads to.
///
/// Returns the authored continuation when the branch table has one, and the
/// generic closing segment otherwise. Fails only when the story itself is
/// unknown. Resolution is deterministic: the same pair always yields the
/// same segment.
pub fn resolve(
    catalog: &StoryCatalog,
    story: &StoryId,
    choice: &ChoiceId,
) -> Result<StorySegment, CatalogError> {
    match catalog.lookup_next(story, choice)? {
        Some(segment) => Ok(segment.clone()),
        None => {
            tracing::debug!(story = %story, choice = %choice, "no authored continuation, closing story");
            Ok(fallback_segment())
        }
    }
}

/// The generic closing segment: terminal, no choices.
pub fn fallback_segment() -> StorySegment {
    StorySegment::ending(GENERIC_END_ID, GENERIC_END_TEXT)
}
