//! Snapshot schema install and verification.
//!
//! There is one table and one version. A fresh database (`user_version`
//! 0) gets the table; a database at `SCHEMA_VERSION` is checked; anything
//! else is rejected rather than rewritten.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Version written to `PRAGMA user_version` once the schema is installed.
pub const SCHEMA_VERSION: u32 = 1;

const SNAPSHOT_SLOTS_TABLE: &str = "snapshot_slots";
const SNAPSHOT_SLOTS_SQL: &str = include_str!("snapshot_slots.sql");

/// Installs the snapshot table on a fresh database or verifies an existing one.
pub fn install_schema(conn: &mut Connection) -> DbResult<()> {
    match stored_version(conn)? {
        0 => {
            let tx = conn.transaction()?;
            tx.execute_batch(SNAPSHOT_SLOTS_SQL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            Ok(())
        }
        SCHEMA_VERSION => verify_schema(conn),
        found => Err(DbError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
    }
}

/// Checks that `conn` carries the snapshot schema without modifying it.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    if found != SCHEMA_VERSION {
        return Err(DbError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            found,
        });
    }

    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [SNAPSHOT_SLOTS_TABLE],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(DbError::MissingTable(SNAPSHOT_SLOTS_TABLE));
    }
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
