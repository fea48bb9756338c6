//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, store and use cases end to end outside any UI.
//! - Keep output line-oriented (`key=value`) for quick local sanity checks.

use chrono::{DateTime, Utc};
use clap::Parser;
use crossbeam::channel::bounded;
use productivity_core::{
    core_version, init_logging, GetNotesUseCase, InMemoryNotesStore, LoggingConfig, Note,
    NotesStore, SaveNoteUseCase, SqliteNotesStore, StoreConfig,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Save a note and list notes updated today")]
struct Cli {
    /// SQLite database file. Uses a private in-memory database when omitted.
    #[arg(long, conflicts_with = "ephemeral")]
    db: Option<PathBuf>,

    /// Use the non-durable in-memory store instead of SQLite.
    #[arg(long)]
    ephemeral: bool,

    /// Absolute directory for rolling log files. Logging stays off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level for `--log-dir`.
    #[arg(long, default_value = productivity_core::default_log_level())]
    log_level: String,

    /// Content of the note to save.
    #[arg(long, default_value = "Hello from productivity_cli")]
    content: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(&LoggingConfig {
            level: cli.log_level.clone(),
            log_dir: log_dir.clone(),
        })?;
    }
    println!("productivity_core version={}", core_version());

    let store = open_store(cli)?;
    let save = SaveNoteUseCase::with_system_clock(Arc::clone(&store));
    let get = GetNotesUseCase::new(store);

    let (saved_tx, saved_rx) = bounded(1);
    save.save(Note::new(cli.content.as_str(), Utc::now()), move |result| {
        let _ = saved_tx.send(result);
    });
    let saved = saved_rx.recv()??;
    println!(
        "saved id={} last_saved_at={}",
        saved.id,
        saved
            .last_saved_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default()
    );

    let (notes_tx, notes_rx) = bounded(1);
    get.get_notes(start_of_today(), move |result| {
        let _ = notes_tx.send(result);
    });
    let notes = notes_rx.recv()??;
    println!("notes count={}", notes.len());
    for note in &notes {
        println!(
            "note id={} last_updated_at={} chars={}",
            note.id,
            note.last_updated_at.to_rfc3339(),
            note.content.chars().count()
        );
    }

    Ok(())
}

fn open_store(cli: &Cli) -> Result<Arc<dyn NotesStore>, Box<dyn Error>> {
    if cli.ephemeral {
        return Ok(Arc::new(InMemoryNotesStore::new()));
    }
    let config = match &cli.db {
        Some(path) => StoreConfig::file(path),
        None => StoreConfig::in_memory(),
    };
    Ok(Arc::new(SqliteNotesStore::open(&config)?))
}

fn start_of_today() -> DateTime<Utc> {
    let now = Utc::now();
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}
