//! Domain and persistence note projections.
//!
//! # Responsibility
//! - Keep `Note` (caller-facing) and `LocalNote` (store-facing) decoupled.
//! - Provide lossless conversions between the two.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `LocalNote::last_saved_at` is always known once a record exists.
//! - A note with empty `content` is never persisted.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Stable identifier shared by `Note` and `LocalNote`.
pub type NoteId = Uuid;

/// Caller-facing note value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    /// Plain text body. Must be non-empty to be saved.
    pub content: String,
    /// Set by the editor; "content as of" timestamp.
    pub last_updated_at: DateTime<Utc>,
    /// Set by the save pipeline. `None` until the first successful save.
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Creates an unsaved note with a freshly generated id.
    pub fn new(content: impl Into<String>, last_updated_at: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), content, last_updated_at)
    }

    /// Creates an unsaved note with a caller-provided id.
    pub fn with_id(
        id: NoteId,
        content: impl Into<String>,
        last_updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            last_updated_at,
            last_saved_at: None,
        }
    }

    /// Returns whether this note has ever been persisted.
    pub fn is_saved(&self) -> bool {
        self.last_saved_at.is_some()
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Store-facing note value.
///
/// Stores depend on this shape only, so persistence changes stay local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNote {
    /// Primary key in storage.
    pub id: NoteId,
    pub content: String,
    pub last_updated_at: DateTime<Utc>,
    pub last_saved_at: DateTime<Utc>,
}

impl LocalNote {
    /// Derives the persisted shape of `note`, stamped with `saved_at`.
    pub fn from_note(note: &Note, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: note.id,
            content: note.content.clone(),
            last_updated_at: note.last_updated_at,
            last_saved_at: saved_at,
        }
    }
}

impl From<LocalNote> for Note {
    fn from(value: LocalNote) -> Self {
        Self {
            id: value.id,
            content: value.content,
            last_updated_at: value.last_updated_at,
            last_saved_at: Some(value.last_saved_at),
        }
    }
}
