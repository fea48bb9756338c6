//! Schema model registry and migration executor.
//!
//! # Responsibility
//! - Map schema model names to their ordered migration lists.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic within one model.
//! - Applied migration version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Name of the schema model backing the notes store.
pub const NOTES_MODEL: &str = "NotesStore";

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

/// Named, versioned schema description resolved at store construction.
#[derive(Debug)]
pub struct SchemaModel {
    name: &'static str,
    migrations: &'static [Migration],
}

const NOTES_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_notes.sql"),
}];

static MODELS: &[SchemaModel] = &[SchemaModel {
    name: NOTES_MODEL,
    migrations: NOTES_MIGRATIONS,
}];

/// Looks up a schema model by name. Names are matched exactly.
pub fn find_model(name: &str) -> Option<&'static SchemaModel> {
    MODELS.iter().find(|model| model.name == name)
}

impl SchemaModel {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the latest migration version known by this binary.
    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map_or(0, |migration| migration.version)
    }
}

/// Applies all pending migrations of `model` on the provided connection.
pub fn apply_migrations(conn: &mut Connection, model: &SchemaModel) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = model.latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            model: model.name,
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in model.migrations {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
