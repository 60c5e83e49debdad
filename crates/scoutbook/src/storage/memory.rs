//! In-process key-value store.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::KeyValueStore;

/// A [`KeyValueStore`] backed by a map, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, Vec<u8>>>,
    read_only: Cell<bool>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Make every later `set` and `remove` fail until switched back.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.read_only.get() {
            return Err(Error::internal(format!("store is read-only: {key}")));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.check_writable(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", b"1").unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains("a"));
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));

        store.remove("a").unwrap();
        assert!(!store.contains("a"));
        assert!(store.get("a").unwrap().is_none());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let store = MemoryStore::new();
        store.set("a", b"1").unwrap();
        store.set_read_only(true);

        assert!(store.set("a", b"2").is_err());
        assert!(store.remove("a").is_err());
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));

        store.set_read_only(false);
        store.set("a", b"2").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"2".to_vec()));
    }
}
