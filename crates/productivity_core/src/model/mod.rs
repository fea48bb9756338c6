//! Note models shared by use cases and persistence.
//!
//! # Responsibility
//! - Define the domain `Note` seen by use-case callers.
//! - Define the persistence-local `LocalNote` exchanged with stores.
//!
//! # Invariants
//! - Both projections are joined by a stable `NoteId`.
//! - Persistence schema changes must not leak into use-case signatures.

pub mod note;
