//! Store and logging configuration.
//!
//! # Responsibility
//! - Describe where the notes store lives and which schema model it uses.
//! - Describe logging level and directory for `init_logging`.
//!
//! # Invariants
//! - Omitted fields fall back to the same defaults as the constructors.

use crate::db::NOTES_MODEL;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the durable store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreLocation {
    /// SQLite database file, created when missing.
    File(PathBuf),
    /// Private database that disappears with the store instance.
    InMemory,
}

/// Construction parameters for `SqliteNotesStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Schema model name resolved through `db::find_model`.
    #[serde(default = "default_model")]
    pub model: String,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            model: default_model(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            model: default_model(),
        }
    }

    /// Overrides the schema model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Parameters for `logging::init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Uses the build-mode default level.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: default_level(),
            log_dir: log_dir.into(),
        }
    }
}

fn default_model() -> String {
    NOTES_MODEL.to_string()
}

fn default_level() -> String {
    default_log_level().to_string()
}

#[cfg(test)]
mod tests {
    use super::{LoggingConfig, StoreConfig, StoreLocation};
    use crate::db::NOTES_MODEL;
    use crate::logging::default_log_level;
    use std::path::PathBuf;

    #[test]
    fn store_config_defaults_model_when_omitted() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"location":{"file":"/var/lib/notes.sqlite3"}}"#).unwrap();
        assert_eq!(
            config.location,
            StoreLocation::File(PathBuf::from("/var/lib/notes.sqlite3"))
        );
        assert_eq!(config.model, NOTES_MODEL);
    }

    #[test]
    fn store_config_accepts_in_memory_location() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"location":"in_memory","model":"Other"}"#).unwrap();
        assert_eq!(config, StoreConfig::in_memory().with_model("Other"));
    }

    #[test]
    fn logging_config_defaults_level() {
        let config: LoggingConfig = serde_json::from_str(r#"{"log_dir":"/tmp/logs"}"#).unwrap();
        assert_eq!(config, LoggingConfig::new("/tmp/logs"));
        assert_eq!(config.level, default_log_level());
    }
}
