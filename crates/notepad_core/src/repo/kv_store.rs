//! Key-value blob stores.
//!
//! # Responsibility
//! - Provide `localStorage`-like `get_item`/`set_item` over string blobs.
//! - Offer an in-process backend for tests and ephemeral sessions.
//!
//! # Invariants
//! - `set_item` overwrites any previous value for the key.
//! - `get_item` returns `None` only when the key was never written.

use super::{StoreError, StoreResult};
use std::collections::HashMap;

/// String blob storage addressed by fixed logical keys.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// Process-local store, mainly for tests and ephemeral sessions.
///
/// `set_read_only(true)` makes writes fail with `StoreError::Unavailable`,
/// which mirrors a browser store whose quota is exhausted.
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    items: HashMap<String, String>,
    read_only: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one raw value, bypassing the read-only switch.
    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::Unavailable(format!(
                "write to `{key}` rejected: store is read-only"
            )));
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore};
    use crate::repo::StoreError;

    #[test]
    fn memory_store_overwrites_values() {
        let mut store = MemoryKeyValueStore::new();
        assert_eq!(store.get_item("notes").unwrap(), None);

        store.set_item("notes", "[]").unwrap();
        store.set_item("notes", "[1]").unwrap();
        assert_eq!(store.get_item("notes").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn memory_store_rejects_writes_when_read_only() {
        let mut store = MemoryKeyValueStore::new().with_item("notes", "[]");
        store.set_read_only(true);

        let err = store.set_item("notes", "[1]").unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.get_item("notes").unwrap().as_deref(), Some("[]"));
    }
}
