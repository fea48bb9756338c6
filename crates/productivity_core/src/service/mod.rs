//! Note use cases.
//!
//! # Responsibility
//! - Validate and stamp notes before persistence.
//! - Translate between `Note` and `LocalNote` at the store boundary.
//! - Classify store failures into use-case error types.
//!
//! # Invariants
//! - Raw `StoreError`s never reach use-case callers.
//! - No completion is delivered after its use case has been dropped.

pub mod get_notes;
pub mod save_note;

use std::sync::{Arc, Weak};

/// Ownership token held by a use case for its whole lifetime.
///
/// Store completions keep only a `LivenessWatch`, so they never extend the
/// use case's lifetime.
#[derive(Debug, Default)]
pub(crate) struct Liveness(Arc<()>);

impl Liveness {
    pub(crate) fn watch(&self) -> LivenessWatch {
        LivenessWatch(Arc::downgrade(&self.0))
    }
}

pub(crate) struct LivenessWatch(Weak<()>);

impl LivenessWatch {
    /// Whether the owning use case still exists.
    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
