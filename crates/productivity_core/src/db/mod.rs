//! Where the notes store's tables come from.
//!
//! A store names a schema model (`NOTES_MODEL` by default). The model is
//! looked up in a compiled registry; an unknown name means the store cannot
//! be built at all. Opening a connection then brings that model's tables up
//! to date before the store worker is handed the connection.
//!
//! A database written by a newer build (higher `user_version` than the
//! model knows) is refused rather than read with the wrong layout.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use migrations::{find_model, SchemaModel, NOTES_MODEL};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate a notes database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated past every version this build ships.
    UnsupportedSchemaVersion {
        model: &'static str,
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                model,
                db_version,
                latest_supported,
            } => write!(
                f,
                "database has `{model}` schema v{db_version}; this build reads up to v{latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
