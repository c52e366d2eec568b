//! The reader's personal story library.
//!
//! Stores one JSON file per created story under a library directory. Each
//! file carries a format version so old libraries are detected rather than
//! misread. Records hold the seed the reader typed, the generated setup,
//! and the style configuration the story was created with.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// Errors from library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Story record not found: {0}")]
    NotFound(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current record file version.
const LIBRARY_VERSION: u32 = 1;

// ============================================================================
// Style enums
// ============================================================================

/// Story genre, stored with the same wire names the record files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    SciFi,
    #[default]
    Fantasy,
    Mystery,
    Romance,
    Thriller,
    Horror,
}

impl Genre {
    pub fn label(&self) -> &'static str {
        match self {
            Genre::SciFi => "Sci-Fi",
            Genre::Fantasy => "Fantasy",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::Thriller => "Thriller",
            Genre::Horror => "Horror",
        }
    }
}

/// Narrative tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Humorous,
    Dark,
    Whimsical,
    Suspenseful,
    Serious,
    #[default]
    Adventurous,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Humorous => "Humorous",
            Tone::Dark => "Dark",
            Tone::Whimsical => "Whimsical",
            Tone::Suspenseful => "Suspenseful",
            Tone::Serious => "Serious",
            Tone::Adventurous => "Adventurous",
        }
    }
}

/// Narration perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    FirstPerson,
    #[default]
    ThirdPerson,
}

impl Perspective {
    pub fn label(&self) -> &'static str {
        match self {
            Perspective::FirstPerson => "First Person",
            Perspective::ThirdPerson => "Third Person",
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// One created story as stored in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: String,

    /// The idea the reader typed.
    pub seed: String,

    /// Generated setup.
    pub title: String,
    pub synopsis: String,

    /// Style the story was created with.
    pub genre: Genre,
    pub tone: Tone,
    pub perspective: Perspective,

    /// Unix second timestamps, stored as strings.
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a record. Style fields default to the platform
/// defaults unless overridden.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub seed: String,
    pub title: String,
    pub synopsis: String,
    pub genre: Genre,
    pub tone: Tone,
    pub perspective: Perspective,
}

impl RecordDraft {
    pub fn new(
        seed: impl Into<String>,
        title: impl Into<String>,
        synopsis: impl Into<String>,
    ) -> Self {
        Self {
            seed: seed.into(),
            title: title.into(),
            synopsis: synopsis.into(),
            genre: Genre::default(),
            tone: Tone::default(),
            perspective: Perspective::default(),
        }
    }

    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genre = genre;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_perspective(mut self, perspective: Perspective) -> Self {
        self.perspective = perspective;
        self
    }
}

/// On-disk envelope around a record.
#[derive(Debug, Serialize, Deserialize)]
struct SavedRecord {
    version: u32,
    record: StoryRecord,
}

/// Generate a record id: a `sto_` prefix plus a random suffix.
pub fn generate_record_id() -> String {
    format!("sto_{}", Uuid::new_v4().simple())
}

/// Current timestamp as unix seconds.
fn now_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

fn parse_timestamp(value: &str) -> u64 {
    value.parse().unwrap_or(0)
}

// ============================================================================
// Library
// ============================================================================

/// Directory-backed collection of story records.
#[derive(Debug, Clone)]
pub struct StoryLibrary {
    dir: PathBuf,
}

impl StoryLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Persist a new record and return it with its generated id and
    /// timestamps filled in.
    pub async fn create(&self, draft: RecordDraft) -> Result<StoryRecord, LibraryError> {
        fs::create_dir_all(&self.dir).await?;

        let now = now_timestamp();
        let record = StoryRecord {
            id: generate_record_id(),
            seed: draft.seed,
            title: draft.title,
            synopsis: draft.synopsis,
            genre: draft.genre,
            tone: draft.tone,
            perspective: draft.perspective,
            created_at: now.clone(),
            updated_at: now,
        };

        let saved = SavedRecord {
            version: LIBRARY_VERSION,
            record,
        };
        let content = serde_json::to_string_pretty(&saved)?;
        fs::write(self.record_path(&saved.record.id), content).await?;
        Ok(saved.record)
    }

    /// Load one record by id.
    pub async fn get(&self, id: &str) -> Result<StoryRecord, LibraryError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(LibraryError::NotFound(id.to_string()));
        }
        load_record(&path).await
    }

    /// All records, newest first. Unreadable files are skipped so one bad
    /// record does not hide the rest of the library.
    pub async fn list(&self) -> Result<Vec<StoryRecord>, LibraryError> {
        let mut records = Vec::new();

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
            return Ok(records);
        }

        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Ok(record) = load_record(&path).await {
                    records.push(record);
                }
            }
        }

        records.sort_by(|a, b| {
            parse_timestamp(&b.created_at)
                .cmp(&parse_timestamp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    fn record_path(&self, id: &str) -> PathBuf {
        let sanitized = id
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>();
        self.dir.join(format!("{sanitized}.json"))
    }
}

async fn load_record(path: &std::path::Path) -> Result<StoryRecord, LibraryError> {
    let content = fs::read_to_string(path).await?;
    let saved: SavedRecord = serde_json::from_str(&content)?;

    if saved.version != LIBRARY_VERSION {
        return Err(LibraryError::VersionMismatch {
            expected: LIBRARY_VERSION,
            found: saved.version,
        });
    }

    Ok(saved.record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn draft(seed: &str, title: &str) -> RecordDraft {
        RecordDraft::new(seed, title, "A synopsis that sets the scene.")
    }

    #[test]
    fn test_record_ids_are_prefixed_and_unique() {
        let a = generate_record_id();
        let b = generate_record_id();
        assert!(a.starts_with("sto_"));
        assert!(b.starts_with("sto_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_style_wire_names() {
        assert_eq!(serde_json::to_value(Genre::SciFi).unwrap(), "sci-fi");
        assert_eq!(serde_json::to_value(Genre::Fantasy).unwrap(), "fantasy");
        assert_eq!(serde_json::to_value(Tone::Suspenseful).unwrap(), "suspenseful");
        assert_eq!(
            serde_json::to_value(Perspective::ThirdPerson).unwrap(),
            "third_person"
        );
    }

    #[test]
    fn test_style_defaults() {
        let d = draft("a seed idea here", "Title");
        assert_eq!(d.genre, Genre::Fantasy);
        assert_eq!(d.tone, Tone::Adventurous);
        assert_eq!(d.perspective, Perspective::ThirdPerson);
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let library = StoryLibrary::new(temp_dir.path());

        let created = library
            .create(
                draft("A detective who only works at dawn", "The Dawn Detective")
                    .with_genre(Genre::Mystery)
                    .with_tone(Tone::Suspenseful),
            )
            .await
            .expect("Create should succeed");

        assert!(created.id.starts_with("sto_"));
        assert_eq!(created.created_at, created.updated_at);

        let loaded = library.get(&created.id).await.expect("Get should succeed");
        assert_eq!(loaded, created);
        assert_eq!(loaded.genre, Genre::Mystery);
        assert_eq!(loaded.perspective, Perspective::ThirdPerson);
    }

    #[tokio::test]
    async fn test_get_missing_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let library = StoryLibrary::new(temp_dir.path());

        let err = library.get("sto_missing").await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(id) if id == "sto_missing"));
    }

    #[tokio::test]
    async fn test_list_creates_missing_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("library");
        let library = StoryLibrary::new(&dir);

        let records = library.list().await.expect("List should succeed");
        assert!(records.is_empty());
        assert!(dir.exists());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let library = StoryLibrary::new(temp_dir.path());

        // Hand-written envelopes with distinct timestamps; create() would
        // stamp them all within the same second.
        for (id, created_at) in [("sto_old", "100"), ("sto_new", "300"), ("sto_mid", "200")] {
            let envelope = serde_json::json!({
                "version": LIBRARY_VERSION,
                "record": {
                    "id": id,
                    "seed": "a seed idea here",
                    "title": id,
                    "synopsis": "s",
                    "genre": "fantasy",
                    "tone": "adventurous",
                    "perspective": "third_person",
                    "created_at": created_at,
                    "updated_at": created_at
                }
            });
            std::fs::write(
                temp_dir.path().join(format!("{id}.json")),
                serde_json::to_string_pretty(&envelope).unwrap(),
            )
            .unwrap();
        }

        let records = library.list().await.expect("List should succeed");
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["sto_new", "sto_mid", "sto_old"]);
    }

    #[tokio::test]
    async fn test_list_skips_unreadable_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let library = StoryLibrary::new(temp_dir.path());

        library
            .create(draft("a perfectly good idea", "Good"))
            .await
            .expect("Create should succeed");
        std::fs::write(temp_dir.path().join("corrupt.json"), "not json").unwrap();

        let records = library.list().await.expect("List should succeed");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Good");
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let library = StoryLibrary::new(temp_dir.path());

        let envelope = serde_json::json!({
            "version": 99,
            "record": {
                "id": "sto_future",
                "seed": "a seed idea here",
                "title": "From The Future",
                "synopsis": "s",
                "genre": "fantasy",
                "tone": "adventurous",
                "perspective": "third_person",
                "created_at": "100",
                "updated_at": "100"
            }
        });
        std::fs::write(
            temp_dir.path().join("sto_future.json"),
            serde_json::to_string(&envelope).unwrap(),
        )
        .unwrap();

        let err = library.get("sto_future").await.unwrap_err();
        assert!(matches!(
            err,
            LibraryError::VersionMismatch {
                expected: LIBRARY_VERSION,
                found: 99
            }
        ));
    }
}
