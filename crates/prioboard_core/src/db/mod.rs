//! SQLite storage for board snapshots.
//!
//! # Responsibility
//! - Open connections with the snapshot schema installed.
//! - Report schema problems as typed errors before any slot access.
//!
//! # Invariants
//! - The schema is a single `snapshot_slots` table at `schema::SCHEMA_VERSION`.
//! - A database written by a different schema version is never touched.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level errors.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// `PRAGMA user_version` differs from the snapshot schema version.
    SchemaMismatch { expected: u32, found: u32 },
    /// Version matches but the table is gone.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaMismatch { expected, found } => write!(
                f,
                "board database has schema version {found}, this build expects {expected}"
            ),
            Self::MissingTable(table) => write!(f, "board database is missing table `{table}`"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
