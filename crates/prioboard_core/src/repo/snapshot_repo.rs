//! Named snapshot slot repository and SQLite implementation.
//!
//! # Responsibility
//! - Read and overwrite one opaque payload per slot key.
//! - Verify the connection schema before any slot access.
//!
//! # Invariants
//! - `write_slot` replaces any prior payload for the same key.
//! - `read_slot` returns `None` for a key that was never written.

use crate::db::schema::verify_schema;
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by snapshot repository operations.
pub type SnapshotRepoResult<T> = Result<T, SnapshotRepoError>;

/// Errors from snapshot repository operations.
#[derive(Debug)]
pub enum SnapshotRepoError {
    /// Underlying SQLite or schema error.
    Db(DbError),
    /// Slot key is blank.
    InvalidSlotKey,
}

impl Display for SnapshotRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidSlotKey => write!(f, "snapshot slot key must not be blank"),
        }
    }
}

impl Error for SnapshotRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for SnapshotRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SnapshotRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for named snapshot slots.
pub trait SnapshotRepository {
    /// Loads the payload stored under `slot_key`, if any.
    fn read_slot(&self, slot_key: &str) -> SnapshotRepoResult<Option<String>>;
    /// Stores `payload` under `slot_key`, overwriting any prior value.
    fn write_slot(&self, slot_key: &str, payload: &str) -> SnapshotRepoResult<()>;
}

/// SQLite-backed snapshot slot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Creates repository from a connection carrying the snapshot schema.
    pub fn try_new(conn: &'conn Connection) -> SnapshotRepoResult<Self> {
        verify_schema(conn)?;
        Ok(Self { conn })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn read_slot(&self, slot_key: &str) -> SnapshotRepoResult<Option<String>> {
        let slot_key = normalize_slot_key(slot_key)?;
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshot_slots WHERE slot_key = ?1;",
                [slot_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&self, slot_key: &str, payload: &str) -> SnapshotRepoResult<()> {
        let slot_key = normalize_slot_key(slot_key)?;
        self.conn.execute(
            "INSERT INTO snapshot_slots (slot_key, payload)
             VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![slot_key, payload],
        )?;
        Ok(())
    }
}

fn normalize_slot_key(slot_key: &str) -> SnapshotRepoResult<&str> {
    let trimmed = slot_key.trim();
    if trimmed.is_empty() {
        return Err(SnapshotRepoError::InvalidSlotKey);
    }
    Ok(trimmed)
}
