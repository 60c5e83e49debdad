//! Storage layer for scoutbook.
//!
//! All persistence goes through the [`KeyValueStore`] port: every logical
//! record (roster, pit scores, schedule, ...) is serialized into one blob and
//! stored under a fixed key, read and written as an atomic whole. There are
//! no transactions spanning keys.
//!
//! Backends:
//! - [`Storage`]: `SQLite`-backed, used by the application.
//! - [`MemoryStore`]: in-process map, used by tests.
//! - [`DebouncedStore`]: wraps another store to coalesce rapid writes.

pub mod codec;
pub mod debounce;
pub mod keys;
pub mod memory;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use debounce::DebouncedStore;
pub use memory::MemoryStore;

/// The persistence port every aggregator is built on.
pub trait KeyValueStore: std::fmt::Debug {
    /// Read the raw bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Handle to the single store instance shared by all aggregators.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// `SQLite`-backed key-value store.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List every stored key in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM entries ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO entries (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "stored entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM entries WHERE key = ?1", [key])?;
        debug!(key, affected, "removed entry");
        Ok(())
    }
}
