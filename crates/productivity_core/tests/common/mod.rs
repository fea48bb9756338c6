#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use productivity_core::{
    Completion, CurrentTime, LocalNote, Note, NoteId, NotesStore, StoreError, StoreResult,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(5);

/// Store double that records calls and holds completions until the test
/// completes them explicitly.
#[derive(Default)]
pub struct NotesStoreSpy {
    state: Mutex<SpyState>,
}

#[derive(Default)]
struct SpyState {
    insertions: Vec<LocalNote>,
    point_lookups: Vec<NoteId>,
    retrievals: Vec<DateTime<Utc>>,
    pending_insertions: VecDeque<Completion<LocalNote>>,
    pending_retrievals: VecDeque<Completion<Vec<LocalNote>>>,
}

impl NotesStoreSpy {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insertions(&self) -> Vec<LocalNote> {
        self.state.lock().unwrap().insertions.clone()
    }

    pub fn retrievals(&self) -> Vec<DateTime<Utc>> {
        self.state.lock().unwrap().retrievals.clone()
    }

    pub fn point_lookups(&self) -> Vec<NoteId> {
        self.state.lock().unwrap().point_lookups.clone()
    }

    /// Completes the oldest pending insert.
    pub fn complete_insertion(&self, result: StoreResult<LocalNote>) {
        let completion = self
            .state
            .lock()
            .unwrap()
            .pending_insertions
            .pop_front()
            .expect("no pending insertion");
        completion(result);
    }

    /// Completes the oldest pending range retrieval.
    pub fn complete_retrieval(&self, result: StoreResult<Vec<LocalNote>>) {
        let completion = self
            .state
            .lock()
            .unwrap()
            .pending_retrievals
            .pop_front()
            .expect("no pending retrieval");
        completion(result);
    }
}

impl NotesStore for NotesStoreSpy {
    fn insert(&self, note: LocalNote, completion: Completion<LocalNote>) {
        let mut state = self.state.lock().unwrap();
        state.insertions.push(note);
        state.pending_insertions.push_back(completion);
    }

    fn retrieve(&self, id: NoteId, completion: Completion<Option<LocalNote>>) {
        self.state.lock().unwrap().point_lookups.push(id);
        completion(Ok(None));
    }

    fn retrieve_since(&self, since: DateTime<Utc>, completion: Completion<Vec<LocalNote>>) {
        let mut state = self.state.lock().unwrap();
        state.retrievals.push(since);
        state.pending_retrievals.push_back(completion);
    }
}

/// Runs `start` with a completion and blocks until it fires.
pub fn wait_for<T: Send + 'static>(start: impl FnOnce(Box<dyn FnOnce(T) + Send>)) -> T {
    let (tx, rx) = crossbeam::channel::bounded(1);
    start(Box::new(move |value| {
        let _ = tx.send(value);
    }));
    rx.recv_timeout(COMPLETION_TIMEOUT)
        .expect("completion should be delivered")
}

/// Shared sink for use-case results delivered by completions.
pub fn result_sink<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl FnOnce(T) + Send + 'static) {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let writer = Arc::clone(&sink);
    (sink, move |value| writer.lock().unwrap().push(value))
}

/// Fixed "now" used instead of the wall clock.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap()
}

pub fn start_of_day(value: DateTime<Utc>) -> DateTime<Utc> {
    value
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn fixed_clock(at: DateTime<Utc>) -> CurrentTime {
    Arc::new(move || at)
}

pub fn unique_note(content: &str, updated_at: DateTime<Utc>) -> (Note, LocalNote) {
    let note = Note::new(content, updated_at);
    let saved_at = updated_at + chrono::Duration::seconds(1);
    let local = LocalNote::from_note(&note, saved_at);
    let note = Note::from(local.clone());
    (note, local)
}

pub fn any_store_error() -> StoreError {
    StoreError::InvalidData("any error".to_string())
}
