//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Keep the notes blob in a single `kv_store` table.
//! - Create that table on first open and refuse layouts from newer builds.
//!
//! # Invariants
//! - The table layout version is mirrored to `PRAGMA user_version`.
//! - No reads or writes happen before the layout check succeeds.
//! - One row per key; writes are upserts.

use super::kv_store::KeyValueStore;
use super::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Layout version written by this build.
pub const KV_SCHEMA_VERSION: u32 = 1;

const CREATE_KV_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Blob store persisted in a SQLite file.
#[derive(Debug)]
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) the database at `path` and prepares `kv_store`.
    ///
    /// # Errors
    /// - `Sqlite` when the file cannot be opened or the table cannot be created.
    /// - `UnsupportedSchema` when the file was written by a newer build.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::connect("file", || Connection::open(path))
    }

    /// Opens a private in-memory database; contents vanish on drop.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::connect("memory", Connection::open_in_memory)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn connect(
        mode: &str,
        open: impl FnOnce() -> rusqlite::Result<Connection>,
    ) -> StoreResult<Self> {
        let started_at = Instant::now();
        let result = open()
            .map_err(StoreError::from)
            .and_then(|mut conn| prepare_table(&mut conn).map(|()| conn));

        match result {
            Ok(conn) => {
                info!(
                    "event=kv_open module=repo status=ok mode={} duration_ms={}",
                    mode,
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn })
            }
            Err(err) => {
                error!(
                    "event=kv_open module=repo status=error mode={} duration_ms={} error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn prepare_table(conn: &mut Connection) -> StoreResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    let tx = conn.transaction()?;
    let found: u32 = tx.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > KV_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found,
            supported: KV_SCHEMA_VERSION,
        });
    }
    if found < KV_SCHEMA_VERSION {
        tx.execute_batch(CREATE_KV_TABLE_SQL)?;
        tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
    }
    tx.commit()?;
    Ok(())
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
