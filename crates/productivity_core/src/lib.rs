//! Note persistence and use-case core.
//!
//! Use cases (`SaveNoteUseCase`, `GetNotesUseCase`) talk to storage only
//! through the asynchronous `NotesStore` port.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{LoggingConfig, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{LocalNote, Note, NoteId};
pub use service::get_notes::{GetNotesError, GetNotesResult, GetNotesUseCase};
pub use service::save_note::{CurrentTime, SaveNoteError, SaveNoteResult, SaveNoteUseCase};
pub use store::memory_store::InMemoryNotesStore;
pub use store::sqlite_store::SqliteNotesStore;
pub use store::{Completion, NotesStore, StoreError, StoreInitializationError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
