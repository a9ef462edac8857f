//! Whole-list note persistence over a key-value blob store.
//!
//! # Responsibility
//! - Serialize the full note list as one JSON array under [`NOTES_KEY`].
//! - Validate loaded data against note-list invariants.
//!
//! # Invariants
//! - `save` always writes the complete list, never a delta.
//! - `load` returns `Ok(None)` only when nothing was ever stored.
//! - A blob with duplicate ids is rejected as `InvalidData`.

use super::kv_store::KeyValueStore;
use super::{StoreError, StoreResult};
use crate::model::note::Note;
use log::debug;
use std::collections::HashSet;

/// Fixed logical key of the notes blob.
pub const NOTES_KEY: &str = "notes";

/// Synchronous load/save contract used by the session controller.
pub trait PersistenceGateway {
    fn load(&self) -> StoreResult<Option<Vec<Note>>>;
    fn save(&mut self, notes: &[Note]) -> StoreResult<()>;
}

/// JSON array gateway, e.g. `[{"id":1,"title":"Groceries","body":"milk"}]`.
#[derive(Debug)]
pub struct JsonBlobGateway<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> JsonBlobGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: KeyValueStore> PersistenceGateway for JsonBlobGateway<S> {
    fn load(&self) -> StoreResult<Option<Vec<Note>>> {
        let Some(raw) = self.store.get_item(NOTES_KEY)? else {
            debug!("event=notes_load module=repo status=ok found=false");
            return Ok(None);
        };

        let notes = decode_notes(raw.as_str())?;
        debug!(
            "event=notes_load module=repo status=ok found=true count={}",
            notes.len()
        );
        Ok(Some(notes))
    }

    fn save(&mut self, notes: &[Note]) -> StoreResult<()> {
        let encoded = serde_json::to_string(notes)?;
        self.store.set_item(NOTES_KEY, encoded.as_str())?;
        debug!(
            "event=notes_save module=repo status=ok count={} bytes={}",
            notes.len(),
            encoded.len()
        );
        Ok(())
    }
}

/// Parses a notes blob. JSON `null` is treated as an empty list.
pub fn decode_notes(raw: &str) -> StoreResult<Vec<Note>> {
    let notes: Option<Vec<Note>> = serde_json::from_str(raw)?;
    let notes = notes.unwrap_or_default();

    let mut seen = HashSet::with_capacity(notes.len());
    for note in &notes {
        if !seen.insert(note.id) {
            return Err(StoreError::InvalidData(format!(
                "duplicate note id `{}`",
                note.id
            )));
        }
    }

    Ok(notes)
}
