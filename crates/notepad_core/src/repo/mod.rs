//! Persistence gateway contracts and key-value storage backends.
//!
//! # Responsibility
//! - Define the whole-list `PersistenceGateway` consumed by the session
//!   controller.
//! - Isolate storage medium details (SQLite, in-memory) behind
//!   `KeyValueStore`.
//!
//! # Invariants
//! - Saves replace the whole note list; there are no partial writes.
//! - Read paths report corrupted blobs instead of masking them; the caller
//!   decides whether to fall back.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv_store;
pub mod note_gateway;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by key-value stores and the note gateway.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// Database was written by a newer build with a different `kv_store` layout.
    UnsupportedSchema { found: u32, supported: u32 },
    Serialization(serde_json::Error),
    /// Stored blob parsed but violates note-list invariants.
    InvalidData(String),
    /// Backend refused the operation (quota, closed handle, injected failure).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchema { found, supported } => write!(
                f,
                "notes database schema {found} is newer than supported {supported}"
            ),
            Self::Serialization(err) => write!(f, "invalid notes blob: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted notes: {message}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::UnsupportedSchema { .. } | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

pub use kv_store::{KeyValueStore, MemoryKeyValueStore};
pub use note_gateway::{JsonBlobGateway, PersistenceGateway, NOTES_KEY};
pub use sqlite_store::{SqliteKeyValueStore, KV_SCHEMA_VERSION};
