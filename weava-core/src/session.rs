//! Reader session state.
//!
//! A [`ReaderSession`] owns one reader's play-through of one story: which
//! segment is on screen, which segments came before it, and whether a
//! transition is in flight. All story content comes from the shared
//! [`StoryCatalog`]; the session only sequences it.
//!
//! Transitions are staged so a frontend can show progress: `begin_choice`
//! archives the current segment and marks the session busy, `finish_choice`
//! resolves the branch and lands in `Ready` or `Error`. `choose` runs both
//! legs for callers that do not need the intermediate state. While a
//! transition is in flight every other operation is rejected with `Busy`.

use crate::catalog::{CatalogError, StoryCatalog};
use crate::resolver::resolve;
use crate::story::{Choice, ChoiceId, StoryData, StoryId, StoryMetadata, StorySegment};
use std::sync::Arc;
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Story error: {0}")]
    Story(#[from] CatalogError),

    #[error("A transition is already in flight")]
    Busy,

    #[error("No story is loaded")]
    NotReady,
}

/// Observable session state.
///
/// `Loading` and `Error` carry the play-through data when they have it, so
/// a frontend can keep the story on screen while a transition is pending or
/// after one has failed. They carry `None` only before the first successful
/// open.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Loading { data: Option<StoryData> },
    Ready(StoryData),
    Error { message: String, data: Option<StoryData> },
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loading { .. } => "loading",
            SessionState::Ready(_) => "ready",
            SessionState::Error { .. } => "error",
        }
    }

    pub fn data(&self) -> Option<&StoryData> {
        match self {
            SessionState::Idle => None,
            SessionState::Loading { data } => data.as_ref(),
            SessionState::Ready(data) => Some(data),
            SessionState::Error { data, .. } => data.as_ref(),
        }
    }
}

/// One reader's play-through of one story.
pub struct ReaderSession {
    catalog: Arc<StoryCatalog>,
    state: SessionState,
    pending: Option<ChoiceId>,
}

impl ReaderSession {
    pub fn new(catalog: Arc<StoryCatalog>) -> Self {
        Self {
            catalog,
            state: SessionState::Idle,
            pending: None,
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Open a story, replacing whatever play-through was loaded before.
    pub fn initialize(&mut self, story: &StoryId) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        self.pending = None;
        self.state = SessionState::Loading { data: None };
        match self.catalog.lookup_initial(story) {
            Ok(data) => {
                tracing::info!(story = %story, title = %data.metadata.title, "story opened");
                self.state = SessionState::Ready(data);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(story = %story, error = %message, "failed to open story");
                self.state = SessionState::Error {
                    message,
                    data: None,
                };
                Err(err.into())
            }
        }
    }

    /// First leg of a transition: archive the current segment into the
    /// history and mark the session busy. The archived entry stays even if
    /// the second leg fails, so the history records the attempted path.
    pub fn begin_choice(&mut self, choice: &Choice) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let mut data = match state {
            SessionState::Ready(data) => data,
            SessionState::Error {
                data: Some(mut data),
                ..
            } => {
                // The failed attempt already archived this segment; refresh
                // that entry instead of stacking a second one.
                if data
                    .history
                    .last()
                    .is_some_and(|last| last.id == data.current_segment.id)
                {
                    data.history.pop();
                }
                data
            }
            other => {
                self.state = other;
                return Err(SessionError::NotReady);
            }
        };
        tracing::debug!(segment = %data.current_segment.id, choice = %choice.id, "choice taken");
        data.history.push(data.current_segment.archived(&choice.text));
        self.pending = Some(choice.id.clone());
        self.state = SessionState::Loading { data: Some(data) };
        Ok(())
    }

    /// Second leg: resolve the pending choice and land in `Ready`, or in
    /// `Error` with the play-through data kept for retry.
    pub fn finish_choice(&mut self) -> Result<StorySegment, SessionError> {
        let pending = self.pending.take().ok_or(SessionError::NotReady)?;
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let mut data = match state {
            SessionState::Loading { data: Some(data) } => data,
            other => {
                self.state = other;
                return Err(SessionError::NotReady);
            }
        };
        let story = data.metadata.id.clone();
        match resolve(&self.catalog, &story, &pending) {
            Ok(segment) => {
                tracing::info!(
                    story = %story,
                    segment = %segment.id,
                    is_end = segment.is_end,
                    "segment resolved"
                );
                data.current_segment = segment.clone();
                self.state = SessionState::Ready(data);
                Ok(segment)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(story = %story, error = %message, "choice resolution failed");
                self.state = SessionState::Error {
                    message,
                    data: Some(data),
                };
                Err(err.into())
            }
        }
    }

    /// Take a choice in one step.
    pub fn choose(&mut self, choice: &Choice) -> Result<StorySegment, SessionError> {
        self.begin_choice(choice)?;
        self.finish_choice()
    }

    /// Return the loaded story to its opening segment with an empty history.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        let story = match self.story_id() {
            Some(id) => id.clone(),
            None => return Err(SessionError::NotReady),
        };
        tracing::info!(story = %story, "restarting story");
        self.initialize(&story)
    }

    /// Acknowledge a displayed error. Returns to `Ready` when the
    /// play-through survived the failure, `Idle` when it did not.
    pub fn clear_error(&mut self) {
        if let SessionState::Error { .. } = self.state {
            let state = std::mem::replace(&mut self.state, SessionState::Idle);
            if let SessionState::Error {
                data: Some(data), ..
            } = state
            {
                self.state = SessionState::Ready(data);
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn data(&self) -> Option<&StoryData> {
        self.state.data()
    }

    pub fn current_segment(&self) -> Option<&StorySegment> {
        self.data().map(|d| &d.current_segment)
    }

    pub fn history(&self) -> &[StorySegment] {
        self.data().map(|d| d.history.as_slice()).unwrap_or(&[])
    }

    pub fn metadata(&self) -> Option<&StoryMetadata> {
        self.data().map(|d| &d.metadata)
    }

    pub fn story_id(&self) -> Option<&StoryId> {
        self.metadata().map(|m| &m.id)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::Loading { .. })
    }

    /// Whether the current segment closes the play-through.
    pub fn at_end(&self) -> bool {
        self.current_segment()
            .map(|s| s.is_terminal())
            .unwrap_or(false)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
impl ReaderSession {
    /// Drop the session into the state a transient resolver failure would
    /// leave behind: the current segment archived, data retained.
    fn force_choice_failure(&mut self, message: &str) {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        match state {
            SessionState::Loading { data: Some(data) } => {
                self.pending = None;
                self.state = SessionState::Error {
                    message: message.to_string(),
                    data: Some(data),
                };
            }
            _ => panic!("force_choice_failure requires an in-flight choice"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tiny_catalog;

    fn session() -> ReaderSession {
        ReaderSession::new(Arc::new(tiny_catalog()))
    }

    fn open(id: &str) -> ReaderSession {
        let mut s = session();
        s.initialize(&StoryId::new(id)).unwrap();
        s
    }

    fn offered(session: &ReaderSession, id: &str) -> Choice {
        session
            .current_segment()
            .and_then(|s| s.choice(&ChoiceId::new(id)))
            .cloned()
            .unwrap_or_else(|| panic!("choice {id} not offered"))
    }

    #[test]
    fn test_initialize_reaches_ready() {
        let s = open("trail");
        assert_eq!(s.state().label(), "ready");
        assert_eq!(s.current_segment().map(|seg| seg.id.as_str()), Some("start"));
        assert!(s.history().is_empty());
        assert!(!s.is_busy());
        assert!(!s.at_end());
    }

    #[test]
    fn test_initialize_unknown_story_is_fatal() {
        let mut s = session();
        let err = s.initialize(&StoryId::new("ghost")).unwrap_err();
        assert!(matches!(err, SessionError::Story(CatalogError::StoryNotFound(_))));
        assert_eq!(s.state().label(), "error");
        assert!(s.data().is_none());
        assert_eq!(s.error_message(), Some("Story not found: ghost"));
    }

    #[test]
    fn test_choose_advances_and_archives() {
        let mut s = open("trail");
        let choice = offered(&s, "left");
        let segment = s.choose(&choice).unwrap();
        assert_eq!(segment.id, "left");
        assert_eq!(s.current_segment().map(|seg| seg.id.as_str()), Some("left"));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].id, "start");
        assert_eq!(s.history()[0].choice_made.as_deref(), Some("Go left"));
    }

    #[test]
    fn test_unmapped_choice_closes_story() {
        let mut s = open("trail");
        let segment = s.choose(&Choice::new("xyz", "xyz")).unwrap();
        assert_eq!(segment.id, "generic_end");
        assert!(s.at_end());
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_operations_rejected_before_open() {
        let mut s = session();
        assert!(matches!(
            s.choose(&Choice::new("left", "Go left")),
            Err(SessionError::NotReady)
        ));
        assert!(matches!(s.restart(), Err(SessionError::NotReady)));
    }

    #[test]
    fn test_staged_choice_exposes_busy_state() {
        let mut s = open("trail");
        let choice = offered(&s, "left");
        s.begin_choice(&choice).unwrap();
        assert!(s.is_busy());
        assert_eq!(s.state().label(), "loading");
        // Data stays visible while busy, history already archived.
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.current_segment().map(|seg| seg.id.as_str()), Some("start"));

        let segment = s.finish_choice().unwrap();
        assert_eq!(segment.id, "left");
        assert!(!s.is_busy());
    }

    #[test]
    fn test_busy_guard_rejects_everything() {
        let mut s = open("trail");
        let choice = offered(&s, "left");
        s.begin_choice(&choice).unwrap();

        assert!(matches!(s.begin_choice(&choice), Err(SessionError::Busy)));
        assert!(matches!(s.choose(&choice), Err(SessionError::Busy)));
        assert!(matches!(
            s.initialize(&StoryId::new("trail")),
            Err(SessionError::Busy)
        ));
        assert!(matches!(s.restart(), Err(SessionError::Busy)));

        // The guarded calls left the in-flight transition intact.
        s.finish_choice().unwrap();
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_restart_resets_play_through() {
        let mut s = open("trail");
        let choice = offered(&s, "left");
        s.choose(&choice).unwrap();
        assert_eq!(s.history().len(), 1);

        s.restart().unwrap();
        assert_eq!(s.current_segment().map(|seg| seg.id.as_str()), Some("start"));
        assert!(s.history().is_empty());
        assert_eq!(s.state().label(), "ready");
    }

    #[test]
    fn test_failed_choice_keeps_data_for_retry() {
        let mut s = open("trail");
        let choice = offered(&s, "left");
        s.begin_choice(&choice).unwrap();
        s.force_choice_failure("the lights went out");

        assert_eq!(s.state().label(), "error");
        assert_eq!(s.error_message(), Some("the lights went out"));
        assert_eq!(s.current_segment().map(|seg| seg.id.as_str()), Some("start"));
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_retry_same_choice_does_not_duplicate_history() {
        let mut s = open("trail");
        let choice = offered(&s, "left");
        s.begin_choice(&choice).unwrap();
        s.force_choice_failure("the lights went out");

        let segment = s.choose(&choice).unwrap();
        assert_eq!(segment.id, "left");
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].choice_made.as_deref(), Some("Go left"));
    }

    #[test]
    fn test_retry_different_choice_refreshes_annotation() {
        let mut s = open("trail");
        let left = offered(&s, "left");
        let right = offered(&s, "right");
        s.begin_choice(&left).unwrap();
        s.force_choice_failure("the lights went out");

        s.choose(&right).unwrap();
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].choice_made.as_deref(), Some("Go right"));
    }

    #[test]
    fn test_clear_error_returns_to_ready_when_data_survived() {
        let mut s = open("trail");
        let choice = offered(&s, "left");
        s.begin_choice(&choice).unwrap();
        s.force_choice_failure("the lights went out");

        s.clear_error();
        assert_eq!(s.state().label(), "ready");
        assert_eq!(s.current_segment().map(|seg| seg.id.as_str()), Some("start"));
    }

    #[test]
    fn test_clear_error_returns_to_idle_after_failed_open() {
        let mut s = session();
        let _ = s.initialize(&StoryId::new("ghost"));
        s.clear_error();
        assert_eq!(s.state().label(), "idle");
    }

    #[test]
    fn test_full_walk_reaches_authored_ending() {
        let mut s = open("trail");
        s.choose(&offered(&s, "left")).unwrap();
        s.choose(&offered(&s, "deeper")).unwrap();
        assert!(s.at_end());
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.history()[0].id, "start");
        assert_eq!(s.history()[1].id, "left");
    }
}
