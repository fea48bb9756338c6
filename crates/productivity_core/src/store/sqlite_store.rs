//! SQLite-backed `NotesStore`.
//!
//! # Responsibility
//! - Own one SQLite connection on a dedicated worker thread.
//! - Serve upsert, point lookup and range lookup over the `notes` table.
//!
//! # Invariants
//! - All operations on one store run on its worker in submission order.
//! - Each insert is one immediate transaction.
//! - Timestamps are stored as Unix epoch nanoseconds.
//! - Undecodable rows surface as `StoreError::InvalidData`.
//! - Completions run on the worker. A panicking completion stops the worker;
//!   every later call completes with `StoreError::Unavailable`.

use crate::config::{StoreConfig, StoreLocation};
use crate::db::{find_model, open_db, open_db_in_memory};
use crate::model::note::{LocalNote, NoteId};
use crate::store::{
    timestamp_nanos, Completion, NotesStore, StoreError, StoreInitializationError,
    StoreResult,
};
use chrono::{DateTime, Utc};
use crossbeam::channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    content,
    last_updated_at,
    last_saved_at
FROM notes";

enum StoreCommand {
    Insert {
        note: LocalNote,
        completion: Completion<LocalNote>,
    },
    Retrieve {
        id: NoteId,
        completion: Completion<Option<LocalNote>>,
    },
    RetrieveSince {
        since: DateTime<Utc>,
        completion: Completion<Vec<LocalNote>>,
    },
    Shutdown,
}

impl StoreCommand {
    /// Completes a command that never reached the worker.
    fn reject(self) {
        match self {
            Self::Insert { completion, .. } => completion(Err(StoreError::Unavailable)),
            Self::Retrieve { completion, .. } => completion(Err(StoreError::Unavailable)),
            Self::RetrieveSince { completion, .. } => completion(Err(StoreError::Unavailable)),
            Self::Shutdown => {}
        }
    }
}

/// Durable notes store with a single serialized execution context.
pub struct SqliteNotesStore {
    commands: Sender<StoreCommand>,
    worker: Option<JoinHandle<()>>,
}

impl SqliteNotesStore {
    /// Opens the store described by `config`.
    ///
    /// Fails synchronously; nothing is scheduled on a store that failed to open.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreInitializationError> {
        let model =
            find_model(&config.model).ok_or_else(|| StoreInitializationError::ModelNotFound {
                model: config.model.clone(),
            })?;

        let conn = match &config.location {
            StoreLocation::File(path) => open_db(path, model),
            StoreLocation::InMemory => open_db_in_memory(model),
        }
        .map_err(StoreInitializationError::FailedToLoadPersistentContainer)?;

        let (commands, inbox) = crossbeam::channel::unbounded();
        let worker = thread::Builder::new()
            .name("notes-store".to_string())
            .spawn(move || run_store_loop(conn, inbox))
            .map_err(StoreInitializationError::WorkerUnavailable)?;

        info!(
            "event=store_open module=store status=ok model={}",
            model.name()
        );
        Ok(Self {
            commands,
            worker: Some(worker),
        })
    }

    fn submit(&self, command: StoreCommand) {
        if let Err(rejected) = self.commands.send(command) {
            warn!("event=store_submit module=store status=error error_code=store_unavailable");
            rejected.into_inner().reject();
        }
    }
}

impl NotesStore for SqliteNotesStore {
    fn insert(&self, note: LocalNote, completion: Completion<LocalNote>) {
        self.submit(StoreCommand::Insert { note, completion });
    }

    fn retrieve(&self, id: NoteId, completion: Completion<Option<LocalNote>>) {
        self.submit(StoreCommand::Retrieve { id, completion });
    }

    fn retrieve_since(&self, since: DateTime<Utc>, completion: Completion<Vec<LocalNote>>) {
        self.submit(StoreCommand::RetrieveSince { since, completion });
    }
}

impl Drop for SqliteNotesStore {
    fn drop(&mut self) {
        let _ = self.commands.send(StoreCommand::Shutdown);
        let Some(worker) = self.worker.take() else {
            return;
        };
        // Dropped from inside a completion: the worker exits on its own.
        if worker.thread().id() == thread::current().id() {
            return;
        }
        if worker.join().is_err() {
            error!("event=store_close module=store status=error error_code=worker_panicked");
        }
    }
}

fn run_store_loop(mut conn: Connection, inbox: Receiver<StoreCommand>) {
    while let Ok(command) = inbox.recv() {
        match command {
            StoreCommand::Insert { note, completion } => {
                let started_at = Instant::now();
                let id = note.id;
                let result = insert_note(&mut conn, note);
                log_outcome("note_insert", &id.to_string(), started_at, &result);
                completion(result);
            }
            StoreCommand::Retrieve { id, completion } => {
                let started_at = Instant::now();
                let result = find_note(&conn, id);
                log_outcome("note_retrieve", &id.to_string(), started_at, &result);
                completion(result);
            }
            StoreCommand::RetrieveSince { since, completion } => {
                let started_at = Instant::now();
                let result = find_notes_since(&conn, since);
                match &result {
                    Ok(notes) => debug!(
                        "event=notes_retrieve_since module=store status=ok count={} duration_ms={}",
                        notes.len(),
                        started_at.elapsed().as_millis()
                    ),
                    Err(err) => warn!(
                        "event=notes_retrieve_since module=store status=error duration_ms={} error={}",
                        started_at.elapsed().as_millis(),
                        err
                    ),
                }
                completion(result);
            }
            StoreCommand::Shutdown => break,
        }
    }
    debug!("event=store_close module=store status=ok");
}

fn log_outcome<T>(event: &str, id: &str, started_at: Instant, result: &StoreResult<T>) {
    match result {
        Ok(_) => debug!(
            "event={} module=store status=ok id={} duration_ms={}",
            event,
            id,
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event={} module=store status=error id={} duration_ms={} error={}",
            event,
            id,
            started_at.elapsed().as_millis(),
            err
        ),
    }
}

fn insert_note(conn: &mut Connection, note: LocalNote) -> StoreResult<LocalNote> {
    let id = note.id.to_string();
    let last_updated_at = timestamp_nanos(note.last_updated_at)?;
    let last_saved_at = timestamp_nanos(note.last_saved_at)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let existing = tx
        .query_row(
            "SELECT 1 FROM notes WHERE id = ?1 LIMIT 1;",
            [id.as_str()],
            |_| Ok(()),
        )
        .optional()?;

    if existing.is_some() {
        tx.execute(
            "UPDATE notes
             SET
                content = ?2,
                last_updated_at = ?3,
                last_saved_at = ?4
             WHERE id = ?1;",
            params![id, note.content.as_str(), last_updated_at, last_saved_at],
        )?;
    } else {
        tx.execute(
            "INSERT INTO notes (
                id,
                content,
                last_updated_at,
                last_saved_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![id, note.content.as_str(), last_updated_at, last_saved_at],
        )?;
    }
    tx.commit()?;

    Ok(note)
}

fn find_note(conn: &Connection, id: NoteId) -> StoreResult<Option<LocalNote>> {
    let sql = format!("{NOTE_SELECT_SQL} WHERE id = ?1 LIMIT 1;");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_note_row(row)?)),
        None => Ok(None),
    }
}

fn find_notes_since(conn: &Connection, since: DateTime<Utc>) -> StoreResult<Vec<LocalNote>> {
    let Some(since) = since_bound(since) else {
        return Ok(Vec::new());
    };
    let sql = format!(
        "{NOTE_SELECT_SQL} WHERE last_updated_at >= ?1 ORDER BY last_updated_at DESC, id ASC;"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([since])?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(parse_note_row(row)?);
    }
    Ok(notes)
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<LocalNote> {
    let id: String = row.get("id")?;
    Ok(LocalNote {
        id: parse_uuid(&id)?,
        content: row.get("content")?,
        last_updated_at: decode_timestamp(row.get("last_updated_at")?),
        last_saved_at: decode_timestamp(row.get("last_saved_at")?),
    })
}

fn parse_uuid(value: &str) -> StoreResult<NoteId> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{value}` in notes.id")))
}

/// Lower bound for the range query; `None` when nothing stored can match.
fn since_bound(since: DateTime<Utc>) -> Option<i64> {
    match since.timestamp_nanos_opt() {
        Some(nanos) => Some(nanos),
        None if since.timestamp() < 0 => Some(i64::MIN),
        None => None,
    }
}

fn decode_timestamp(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

#[cfg(test)]
mod tests {
    use super::{decode_timestamp, parse_uuid, since_bound};
    use crate::store::{timestamp_nanos, StoreError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn timestamps_keep_nanosecond_precision() {
        let value = Utc
            .with_ymd_and_hms(2024, 5, 10, 9, 30, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::nanoseconds(123_456_789))
            .unwrap();
        assert_eq!(decode_timestamp(timestamp_nanos(value).unwrap()), value);
    }

    #[test]
    fn timestamps_outside_storable_range_are_invalid_data() {
        let far_future = Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            timestamp_nanos(far_future),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn since_bound_clamps_out_of_range_values() {
        let early = Utc.with_ymd_and_hms(1600, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap();
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(since_bound(early), Some(i64::MIN));
        assert_eq!(since_bound(late), None);
        assert_eq!(since_bound(epoch), Some(0));
    }

    #[test]
    fn malformed_uuid_is_invalid_data() {
        assert!(matches!(
            parse_uuid("not-a-uuid"),
            Err(StoreError::InvalidData(_))
        ));
    }
}
