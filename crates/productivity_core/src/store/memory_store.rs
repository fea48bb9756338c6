//! In-memory `NotesStore`.
//!
//! Same contract as `SqliteNotesStore` without durability. Completions run
//! inline on the calling thread, in call order.
//!
//! A panic while the map is locked leaves it consistent (every mutation is a
//! single `BTreeMap::insert`), so a poisoned lock is recovered, not reported.

use crate::model::note::{LocalNote, NoteId};
use crate::store::{ensure_storable, sort_most_recent_first, Completion, NotesStore};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct InMemoryNotesStore {
    notes: Mutex<BTreeMap<NoteId, LocalNote>>,
}

impl InMemoryNotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<NoteId, LocalNote>> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotesStore for InMemoryNotesStore {
    fn insert(&self, note: LocalNote, completion: Completion<LocalNote>) {
        let result = ensure_storable(&note).map(|()| {
            self.lock().insert(note.id, note.clone());
            note
        });
        completion(result);
    }

    fn retrieve(&self, id: NoteId, completion: Completion<Option<LocalNote>>) {
        let found = self.lock().get(&id).cloned();
        completion(Ok(found));
    }

    fn retrieve_since(&self, since: DateTime<Utc>, completion: Completion<Vec<LocalNote>>) {
        let mut matching = self
            .lock()
            .values()
            .filter(|note| note.last_updated_at >= since)
            .cloned()
            .collect::<Vec<_>>();
        sort_most_recent_first(&mut matching);
        completion(Ok(matching));
    }
}
