//! Notes store port and its implementations.
//!
//! # Responsibility
//! - Define the asynchronous `NotesStore` contract consumed by use cases.
//! - Define store-level error types.
//!
//! # Invariants
//! - Every completion is invoked exactly once per call.
//! - Callers must not assume synchronous or same-thread completion.
//! - `insert` is an upsert keyed by `LocalNote::id`.
//! - Reads never mutate storage.

use crate::db::DbError;
use crate::model::note::{LocalNote, NoteId};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Callback receiving the outcome of one store operation.
pub type Completion<T> = Box<dyn FnOnce(StoreResult<T>) + Send + 'static>;

/// Asynchronous note persistence capability.
///
/// Use cases depend only on this trait, so any implementation can be
/// substituted without touching them.
pub trait NotesStore: Send + Sync {
    /// Creates or overwrites the record with `note.id`.
    ///
    /// Completes with exactly what was persisted. Timestamps outside the
    /// nanosecond range of `i64` (roughly years 1677 to 2262) are rejected
    /// with `StoreError::InvalidData`.
    fn insert(&self, note: LocalNote, completion: Completion<LocalNote>);

    /// Point lookup by primary key. A missing id completes with `Ok(None)`.
    fn retrieve(&self, id: NoteId, completion: Completion<Option<LocalNote>>);

    /// All records with `last_updated_at >= since`, most recently updated first.
    ///
    /// Any `since` is accepted; bounds outside the storable range simply
    /// match every record or none.
    fn retrieve_since(&self, since: DateTime<Utc>, completion: Completion<Vec<LocalNote>>);
}

/// Failure of one store operation.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite query or commit failure.
    Db(DbError),
    /// Persisted or incoming data cannot be represented.
    InvalidData(String),
    /// The store's execution context has shut down, e.g. after a completion
    /// panicked on the SQLite worker.
    Unavailable,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid note data: {message}"),
            Self::Unavailable => write!(f, "notes store is no longer running"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Failure to construct a durable store.
///
/// A store that failed to initialize must not be used.
#[derive(Debug)]
pub enum StoreInitializationError {
    /// The requested schema model is not registered.
    ModelNotFound { model: String },
    /// The storage engine could not open or migrate the location.
    FailedToLoadPersistentContainer(DbError),
    /// The worker thread owning the connection could not be started.
    WorkerUnavailable(std::io::Error),
}

impl Display for StoreInitializationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModelNotFound { model } => write!(f, "schema model not found: `{model}`"),
            Self::FailedToLoadPersistentContainer(err) => {
                write!(f, "failed to load persistent store: {err}")
            }
            Self::WorkerUnavailable(err) => write!(f, "failed to start store worker: {err}"),
        }
    }
}

impl Error for StoreInitializationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ModelNotFound { .. } => None,
            Self::FailedToLoadPersistentContainer(err) => Some(err),
            Self::WorkerUnavailable(err) => Some(err),
        }
    }
}

/// Encodes `value` as Unix epoch nanoseconds, the unit notes are stored in.
pub(crate) fn timestamp_nanos(value: DateTime<Utc>) -> StoreResult<i64> {
    value.timestamp_nanos_opt().ok_or_else(|| {
        StoreError::InvalidData(format!("timestamp {value} is outside the storable range"))
    })
}

/// Rejects notes that no store could persist.
pub(crate) fn ensure_storable(note: &LocalNote) -> StoreResult<()> {
    timestamp_nanos(note.last_updated_at)?;
    timestamp_nanos(note.last_saved_at)?;
    Ok(())
}

/// Orders notes by `last_updated_at` descending, ties by id ascending.
pub(crate) fn sort_most_recent_first(notes: &mut [LocalNote]) {
    notes.sort_by(|left, right| {
        right
            .last_updated_at
            .cmp(&left.last_updated_at)
            .then_with(|| left.id.cmp(&right.id))
    });
}
