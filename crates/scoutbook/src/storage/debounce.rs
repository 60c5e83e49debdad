//! Trailing-edge write coalescing.
//!
//! A staged write is held until `delay` has passed since the most recent
//! write to the same key. Later writes replace earlier ones (last write wins)
//! and push the deadline out. There is no cancellation: a staged write is
//! always eventually flushed, at the latest when the store is dropped.
//!
//! Time is passed in explicitly so the policy can be driven by any event
//! loop and tested without sleeping.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::Result;

use super::{KeyValueStore, SharedStore};

#[derive(Debug, Clone)]
struct PendingWrite {
    bytes: Vec<u8>,
    due: Instant,
}

/// A [`KeyValueStore`] wrapper that can defer writes.
///
/// The [`KeyValueStore`] methods write through immediately and discard any
/// staged value for the key; [`stage`](Self::stage) defers.
#[derive(Debug)]
pub struct DebouncedStore {
    inner: SharedStore,
    delay: Duration,
    pending: RefCell<BTreeMap<String, PendingWrite>>,
}

impl DebouncedStore {
    /// Wrap `inner`, deferring staged writes by `delay`.
    #[must_use]
    pub fn new(inner: SharedStore, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            pending: RefCell::new(BTreeMap::new()),
        }
    }

    /// Stage a write of `value` under `key`, due `delay` after `now`.
    pub fn stage(&self, key: &str, value: Vec<u8>, now: Instant) {
        let due = now + self.delay;
        self.pending
            .borrow_mut()
            .insert(key.to_string(), PendingWrite { bytes: value, due });
    }

    /// Whether a write for `key` is waiting.
    #[must_use]
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.borrow().contains_key(key)
    }

    /// Number of keys with a waiting write.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Write every staged value whose deadline is at or before `now`.
    ///
    /// Returns the number of keys written.
    ///
    /// # Errors
    ///
    /// Returns the first write error; values not yet written stay staged.
    pub fn flush_due(&self, now: Instant) -> Result<usize> {
        self.flush_where(|write| write.due <= now)
    }

    /// Write every staged value regardless of deadline.
    ///
    /// # Errors
    ///
    /// Returns the first write error; values not yet written stay staged.
    pub fn flush(&self) -> Result<usize> {
        self.flush_where(|_| true)
    }

    fn flush_where(&self, ready: impl Fn(&PendingWrite) -> bool) -> Result<usize> {
        let due: Vec<(String, Vec<u8>)> = self
            .pending
            .borrow()
            .iter()
            .filter(|(_, write)| ready(*write))
            .map(|(key, write)| (key.clone(), write.bytes.clone()))
            .collect();

        for (key, bytes) in &due {
            self.inner.set(key, bytes)?;
            self.pending.borrow_mut().remove(key);
            debug!(key = key.as_str(), "flushed debounced write");
        }
        Ok(due.len())
    }
}

impl KeyValueStore for DebouncedStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(write) = self.pending.borrow().get(key) {
            return Ok(Some(write.bytes.clone()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.inner.set(key, value)?;
        self.pending.borrow_mut().remove(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)?;
        self.pending.borrow_mut().remove(key);
        Ok(())
    }
}

impl Drop for DebouncedStore {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "failed to flush debounced writes on drop");
        }
    }
}
