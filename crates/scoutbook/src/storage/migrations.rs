//! Database layout versioning for scoutbook.
//!
//! Record shapes inside the `entries` table are not versioned; only the
//! table layout itself is tracked. A fresh database is stamped with
//! [`LAYOUT_VERSION`]; a database stamped by a newer build is refused rather
//! than guessed at.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// Version of the table layout this build writes.
pub const LAYOUT_VERSION: u32 = 1;

const VERSION_KEY: &str = "layout_version";

/// Create the tables if needed and check the stored layout version.
///
/// # Errors
///
/// Returns an error if table creation fails or the database was written with
/// an unknown or newer layout.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match stored_version(conn)? {
        None => {
            stamp_version(conn)?;
            debug!(version = LAYOUT_VERSION, "stamped new database");
            Ok(())
        }
        Some(version) if version <= LAYOUT_VERSION => Ok(()),
        Some(version) => Err(Error::DatabaseMigration {
            message: format!(
                "database layout {version} is newer than supported layout {LAYOUT_VERSION}"
            ),
        }),
    }
}

/// The stamped layout version, or `None` for a database never stamped.
fn stored_version(conn: &Connection) -> Result<Option<u32>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|v| {
            v.parse().map_err(|_| Error::DatabaseMigration {
                message: format!("unreadable layout version: {v}"),
            })
        })
        .transpose()
}

fn stamp_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, LAYOUT_VERSION.to_string()),
    )?;
    Ok(())
}
