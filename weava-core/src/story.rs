//! Core story types.
//!
//! Contains the types that describe a branching story as the reader sees it:
//! metadata, segments, choices, and the accumulated play-through data.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ID Types
// ============================================================================

/// Identifier for a story in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier for a choice within a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(String);

impl ChoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChoiceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChoiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Story Content
// ============================================================================

/// Descriptive metadata shown before and during a play-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryMetadata {
    pub id: StoryId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub estimated_time: String,
    pub description: String,
}

/// One selectable option presented at the end of a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub text: String,
    /// Optional hint at what picking this choice implies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence: Option<String>,
}

impl Choice {
    pub fn new(id: impl Into<ChoiceId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            consequence: None,
        }
    }

    pub fn with_consequence(mut self, consequence: impl Into<String>) -> Self {
        self.consequence = Some(consequence.into());
        self
    }
}

/// One passage of story text plus the choices that lead out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySegment {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_end: bool,
    /// Set on history entries: the text of the choice taken from here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_made: Option<String>,
}

impl StorySegment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices: Vec::new(),
            is_end: false,
            choice_made: None,
        }
    }

    /// A terminal segment with no outgoing choices.
    pub fn ending(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            is_end: true,
            ..Self::new(id, text)
        }
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    /// Whether the play-through stops here. A segment with no choices is
    /// terminal even if it does not carry the explicit end flag.
    pub fn is_terminal(&self) -> bool {
        self.is_end || self.choices.is_empty()
    }

    /// Copy of this segment annotated with the choice taken from it,
    /// suitable for appending to the history.
    pub fn archived(&self, choice_text: &str) -> StorySegment {
        StorySegment {
            choice_made: Some(choice_text.to_string()),
            ..self.clone()
        }
    }

    /// Look up an outgoing choice by id.
    pub fn choice(&self, id: &ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|c| &c.id == id)
    }
}

/// Everything a reader holds while playing one story: the metadata, the
/// segment currently on screen, and the segments already passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryData {
    pub metadata: StoryMetadata,
    pub current_segment: StorySegment,
    /// Passed segments in order, each annotated with the choice taken.
    pub history: Vec<StorySegment>,
}

impl StoryData {
    pub fn new(metadata: StoryMetadata, opening: StorySegment) -> Self {
        Self {
            metadata,
            current_segment: opening,
            history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_with_choices_is_not_terminal() {
        let segment = StorySegment::new("start", "You wake up.")
            .with_choices(vec![Choice::new("door", "Open the door")]);
        assert!(!segment.is_terminal());
    }

    #[test]
    fn test_segment_without_choices_is_terminal() {
        let segment = StorySegment::new("quiet", "Nothing else happens.");
        assert!(segment.is_terminal());
        assert!(!segment.is_end);
    }

    #[test]
    fn test_ending_segment_is_terminal() {
        let segment = StorySegment::ending("finale", "The end.");
        assert!(segment.is_end);
        assert!(segment.is_terminal());
    }

    #[test]
    fn test_archived_annotates_choice() {
        let segment = StorySegment::new("start", "You wake up.")
            .with_choices(vec![Choice::new("door", "Open the door")]);
        let entry = segment.archived("Open the door");
        assert_eq!(entry.choice_made.as_deref(), Some("Open the door"));
        assert_eq!(entry.id, segment.id);
        assert_eq!(entry.text, segment.text);
        assert!(segment.choice_made.is_none());
    }

    #[test]
    fn test_choice_lookup() {
        let segment = StorySegment::new("start", "A fork in the road.").with_choices(vec![
            Choice::new("left", "Go left"),
            Choice::new("right", "Go right").with_consequence("Shorter but steeper"),
        ]);
        assert_eq!(
            segment.choice(&ChoiceId::new("right")).map(|c| c.text.as_str()),
            Some("Go right")
        );
        assert!(segment.choice(&ChoiceId::new("straight")).is_none());
    }

    #[test]
    fn test_segment_serialization_omits_empty_fields() {
        let segment = StorySegment::ending("finale", "The end.");
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["is_end"], true);
        assert!(json.get("choices").is_none());
        assert!(json.get("choice_made").is_none());
    }
}
