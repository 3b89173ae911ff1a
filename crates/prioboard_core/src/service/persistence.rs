//! Board snapshot persistence.
//!
//! # Responsibility
//! - Serialize the whole board to one named slot after every mutation.
//! - Load that slot once at startup, falling back to an empty board.
//!
//! # Invariants
//! - `load` never fails: absent, unreadable, malformed or invalid snapshots
//!   all yield `Board::default()`.
//! - `save` overwrites the slot; there is no history or versioning.

use crate::model::board::Board;
use crate::repo::snapshot_repo::{SnapshotRepoError, SnapshotRepository};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from snapshot save.
#[derive(Debug)]
pub enum PersistenceError {
    Encode(serde_json::Error),
    Repo(SnapshotRepoError),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode board snapshot: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<SnapshotRepoError> for PersistenceError {
    fn from(value: SnapshotRepoError) -> Self {
        Self::Repo(value)
    }
}

/// Saves and loads the board under one slot key.
pub struct BoardPersistence<R: SnapshotRepository> {
    repo: R,
    slot_key: String,
}

impl<R: SnapshotRepository> BoardPersistence<R> {
    pub fn new(repo: R, slot_key: impl Into<String>) -> Self {
        Self {
            repo,
            slot_key: slot_key.into(),
        }
    }

    pub fn slot_key(&self) -> &str {
        self.slot_key.as_str()
    }

    /// Writes the full board snapshot, overwriting any prior value.
    pub fn save(&self, board: &Board) -> Result<(), PersistenceError> {
        let payload = serde_json::to_string(board).map_err(PersistenceError::Encode)?;
        self.repo.write_slot(self.slot_key.as_str(), payload.as_str())?;
        debug!(
            "event=snapshot_save module=persistence status=ok topics={} recycled={} bytes={}",
            board.topics.len(),
            board.recycle_bin.len(),
            payload.len()
        );
        Ok(())
    }

    /// Reads the board snapshot, or an empty board when none is usable.
    pub fn load(&self) -> Board {
        let payload = match self.repo.read_slot(self.slot_key.as_str()) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("event=snapshot_load module=persistence status=empty reason=absent");
                return Board::default();
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=persistence status=fallback reason=read_failed error={}",
                    err
                );
                return Board::default();
            }
        };

        let board = match serde_json::from_str::<Board>(payload.as_str()) {
            Ok(board) => board,
            Err(err) => {
                warn!(
                    "event=snapshot_load module=persistence status=fallback reason=malformed line={} column={}",
                    err.line(),
                    err.column()
                );
                return Board::default();
            }
        };

        if let Err(err) = board.validate() {
            warn!(
                "event=snapshot_load module=persistence status=fallback reason=invalid error={}",
                err
            );
            return Board::default();
        }

        debug!(
            "event=snapshot_load module=persistence status=ok topics={} recycled={}",
            board.topics.len(),
            board.recycle_bin.len()
        );
        board
    }
}
