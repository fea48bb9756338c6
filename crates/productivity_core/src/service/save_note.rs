//! Save-note use case.
//!
//! # Responsibility
//! - Reject notes with empty content before any I/O.
//! - Stamp `last_saved_at` from the injected clock and upsert via the store.
//!
//! # Invariants
//! - `InvalidContent` completes synchronously and issues no store call.
//! - Any store failure is reported as `InsertionError`.
//! - A dropped use case never calls its completion.

use crate::model::note::{LocalNote, Note};
use crate::service::Liveness;
use crate::store::NotesStore;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Clock capability used to stamp `last_saved_at`.
pub type CurrentTime = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub type SaveNoteResult = Result<Note, SaveNoteError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveNoteError {
    /// Note content is empty.
    InvalidContent,
    /// The store failed to persist the note.
    InsertionError,
}

impl Display for SaveNoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContent => write!(f, "note content must not be empty"),
            Self::InsertionError => write!(f, "note could not be saved"),
        }
    }
}

impl Error for SaveNoteError {}

pub struct SaveNoteUseCase {
    store: Arc<dyn NotesStore>,
    current_time: CurrentTime,
    liveness: Liveness,
}

impl SaveNoteUseCase {
    pub fn new(store: Arc<dyn NotesStore>, current_time: CurrentTime) -> Self {
        Self {
            store,
            current_time,
            liveness: Liveness::default(),
        }
    }

    /// Stamps saves with `Utc::now`.
    pub fn with_system_clock(store: Arc<dyn NotesStore>) -> Self {
        Self::new(store, Arc::new(Utc::now))
    }

    /// Validates, stamps and persists `note`.
    ///
    /// On success the completion receives the persisted note, with
    /// `last_saved_at` set.
    pub fn save<F>(&self, note: Note, completion: F)
    where
        F: FnOnce(SaveNoteResult) + Send + 'static,
    {
        if !note.has_content() {
            debug!(
                "event=note_save module=service status=error id={} error_code=invalid_content",
                note.id
            );
            completion(Err(SaveNoteError::InvalidContent));
            return;
        }

        let stamped = LocalNote::from_note(&note, (self.current_time)());
        let watch = self.liveness.watch();
        self.store.insert(
            stamped,
            Box::new(move |result| {
                if !watch.is_alive() {
                    debug!(
                        "event=note_save module=service status=discarded id={}",
                        note.id
                    );
                    return;
                }

                match result {
                    Ok(saved) => completion(Ok(Note::from(saved))),
                    Err(err) => {
                        warn!(
                            "event=note_save module=service status=error id={} error_code=insertion_failed error={}",
                            note.id, err
                        );
                        completion(Err(SaveNoteError::InsertionError));
                    }
                }
            }),
        );
    }
}
