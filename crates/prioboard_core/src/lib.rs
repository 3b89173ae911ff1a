//! Core domain logic for the priority board.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{BoardConfig, BucketConfig, ConfigError, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::board::{
    subtopic_serial, topic_serial, Board, BoardValidationError, Column, EntityId,
    RecycleBinEntry, RecycledSubtopic, Subtopic, SubtopicId, Topic, TopicId,
};
pub use repo::snapshot_repo::{
    SnapshotRepoError, SnapshotRepoResult, SnapshotRepository, SqliteSnapshotRepository,
};
pub use service::board_store::{BoardError, BoardResult, BoardStore, RestoreOutcome};
pub use service::controller::{
    ControllerError, ControllerResult, DragItem, DropTarget, EditToggle, EntityRef, Gesture,
    InteractionController, Notice,
};
pub use service::persistence::{BoardPersistence, PersistenceError};
pub use view::drag::{insertion_point, SiblingBox};
pub use view::render::{
    render, BoardView, MatrixColumnView, RecycleRow, SubtopicRow, TaskCard, TopicRow, ViewAction,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
