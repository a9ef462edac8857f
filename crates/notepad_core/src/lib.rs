//! Core domain logic for Notepad.
//! This crate is the single source of truth for note-list and session
//! invariants; presentation layers only forward intents and render snapshots.

pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingError,
};
pub use model::note::{Note, NoteId, UNTITLED_NOTE_LABEL};
pub use model::session::{Session, SessionState};
pub use repo::{
    JsonBlobGateway, KeyValueStore, MemoryKeyValueStore, PersistenceGateway,
    SqliteKeyValueStore, StoreError, StoreResult, KV_SCHEMA_VERSION, NOTES_KEY,
};
pub use search::filter::{search_notes, SearchOutcome};
pub use service::config::{ControllerConfig, DiscardPolicy, LoadPolicy};
pub use service::note_controller::{
    NoteController, SessionError, SessionResult, SessionSnapshot,
};

/// Controller persisted through the SQLite key-value store.
pub type SqliteNoteController = NoteController<JsonBlobGateway<SqliteKeyValueStore>>;

/// Opens `path` (creating it when missing) and loads its note list.
///
/// # Errors
/// - `PersistenceUnavailable` when the database cannot be opened or migrated,
///   or when loading fails under `LoadPolicy::Strict`.
pub fn open_sqlite_controller(
    path: impl AsRef<std::path::Path>,
    config: ControllerConfig,
) -> SessionResult<SqliteNoteController> {
    let store = SqliteKeyValueStore::open(path)?;
    NoteController::open(JsonBlobGateway::new(store), config)
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
