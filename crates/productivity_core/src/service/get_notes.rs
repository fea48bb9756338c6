//! Get-notes use case.
//!
//! # Responsibility
//! - Fetch notes updated since a timestamp and map them to `Note`.
//!
//! # Invariants
//! - Results satisfy `last_updated_at >= since`, most recently updated first.
//! - Any store failure is reported as `RetrievalError`.
//! - A dropped use case never calls its completion.

use crate::model::note::{LocalNote, Note};
use crate::service::Liveness;
use crate::store::NotesStore;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type GetNotesResult = Result<Vec<Note>, GetNotesError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetNotesError {
    /// The store failed to read notes.
    RetrievalError,
}

impl Display for GetNotesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RetrievalError => write!(f, "notes could not be retrieved"),
        }
    }
}

impl Error for GetNotesError {}

pub struct GetNotesUseCase {
    store: Arc<dyn NotesStore>,
    liveness: Liveness,
}

impl GetNotesUseCase {
    pub fn new(store: Arc<dyn NotesStore>) -> Self {
        Self {
            store,
            liveness: Liveness::default(),
        }
    }

    /// Delivers notes with `last_updated_at >= since`, most recent first.
    pub fn get_notes<F>(&self, since: DateTime<Utc>, completion: F)
    where
        F: FnOnce(GetNotesResult) + Send + 'static,
    {
        let watch = self.liveness.watch();
        self.store.retrieve_since(
            since,
            Box::new(move |result| {
                if !watch.is_alive() {
                    debug!("event=notes_get module=service status=discarded");
                    return;
                }

                match result {
                    Ok(local_notes) => completion(Ok(recent_notes(local_notes, since))),
                    Err(err) => {
                        warn!(
                            "event=notes_get module=service status=error error_code=retrieval_failed error={}",
                            err
                        );
                        completion(Err(GetNotesError::RetrievalError));
                    }
                }
            }),
        );
    }
}

/// Re-applies the store's range predicate and ordering.
///
/// The store already filters and sorts; this keeps the use-case contract
/// independent of any one store implementation.
fn recent_notes(mut local_notes: Vec<LocalNote>, since: DateTime<Utc>) -> Vec<Note> {
    local_notes.retain(|note| note.last_updated_at >= since);
    local_notes.sort_by(|left, right| right.last_updated_at.cmp(&left.last_updated_at));
    local_notes.into_iter().map(Note::from).collect()
}
