//! JSON encoding of records on top of a [`KeyValueStore`].
//!
//! Reads are lenient: a failed read or an undecodable blob is logged and
//! reported as absent, so callers fall back to an empty default. Writes
//! propagate their errors.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

use super::KeyValueStore;

/// Decode the record under `key`, or `None` if missing, unreadable or corrupt.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let bytes = match store.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "store read failed, treating as absent");
            return None;
        }
    };
    decode(key, &bytes)
}

/// Decode a blob captured under `key`, logging failures.
pub fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Option<T> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding undecodable record");
            None
        }
    }
}

/// Encode `value` and store it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub fn save<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let bytes = encode(value)?;
    debug!(key, bytes = bytes.len(), "saving record");
    store.set(key, &bytes)
}

/// Encode `value` as JSON bytes.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}
