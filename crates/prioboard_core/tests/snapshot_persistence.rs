use prioboard_core::db::schema::SCHEMA_VERSION;
use prioboard_core::db::{open_db, open_db_in_memory, DbError};
use prioboard_core::{
    Board, BoardPersistence, BoardStore, Column, SnapshotRepoError, SnapshotRepository,
    SqliteSnapshotRepository, DEFAULT_STORAGE_KEY,
};
use rusqlite::Connection;

fn populated_store() -> BoardStore {
    let mut store = BoardStore::new();
    let groceries = store.add_topic("Groceries").unwrap();
    let work = store.add_topic("Work").unwrap();
    store
        .add_subtopic(groceries, "Milk", Column::TodayNotLazy)
        .unwrap();
    let eggs = store
        .add_subtopic(groceries, "Eggs", Column::Unassigned)
        .unwrap();
    store
        .add_subtopic(work, "Report", Column::SpecificDate)
        .unwrap();
    let old = store.add_topic("Old").unwrap();
    store.add_subtopic(old, "Stale", Column::TodayLazy).unwrap();

    store.delete_subtopic(groceries, eggs).unwrap();
    store.delete_topic(old).unwrap();
    store
}

#[test]
fn open_installs_snapshot_slots_table() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'snapshot_slots'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn repository_rejects_connection_without_schema() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteSnapshotRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        SnapshotRepoError::Db(DbError::SchemaMismatch { found: 0, .. })
    ));
}

#[test]
fn write_slot_overwrites_previous_payload() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    assert_eq!(repo.read_slot("k").unwrap(), None);
    repo.write_slot("k", "one").unwrap();
    repo.write_slot("k", "two").unwrap();
    assert_eq!(repo.read_slot("k").unwrap().as_deref(), Some("two"));
    assert!(matches!(
        repo.write_slot("  ", "x"),
        Err(SnapshotRepoError::InvalidSlotKey)
    ));
}

#[test]
fn load_of_save_reproduces_board() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let persistence = BoardPersistence::new(repo, DEFAULT_STORAGE_KEY);
    let board = populated_store().into_board();

    persistence.save(&board).unwrap();
    let loaded = persistence.load();

    assert_eq!(loaded, board);
    assert_eq!(loaded.recycle_bin.len(), 2);
}

#[test]
fn load_falls_back_to_empty_board() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    repo.write_slot("broken", "{not json").unwrap();
    repo.write_slot("wrong-shape", r#"{"topics": 5}"#).unwrap();

    for key in ["absent", "broken", "wrong-shape"] {
        let persistence = BoardPersistence::new(SqliteSnapshotRepository::try_new(&conn).unwrap(), key);
        assert_eq!(persistence.load(), Board::default(), "slot {key}");
    }
}

#[test]
fn load_rejects_snapshot_with_duplicate_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let id = uuid::Uuid::new_v4();
    let payload = format!(
        r#"{{"topics":[{{"id":"{id}","text":"A","subtopics":[]}},{{"id":"{id}","text":"B","subtopics":[]}}],"recycleBin":[]}}"#
    );
    repo.write_slot(DEFAULT_STORAGE_KEY, payload.as_str()).unwrap();

    let persistence = BoardPersistence::new(repo, DEFAULT_STORAGE_KEY);
    assert!(persistence.load().is_empty());
}

#[test]
fn snapshot_json_uses_stable_wire_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let persistence = BoardPersistence::new(repo, DEFAULT_STORAGE_KEY);
    persistence.save(&populated_store().into_board()).unwrap();

    let raw = SqliteSnapshotRepository::try_new(&conn)
        .unwrap()
        .read_slot(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(raw.as_str()).unwrap();
    assert_eq!(json["topics"][0]["subtopics"][0]["column"], "today-not-lazy");
    assert_eq!(json["recycleBin"][0]["type"], "subtopic");
    assert_eq!(json["recycleBin"][0]["column"], "none");
    assert!(json["recycleBin"][0]["parentId"].is_string());
    assert_eq!(json["recycleBin"][1]["type"], "topic");
}

#[test]
fn file_backed_snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");
    let board = populated_store().into_board();

    {
        let conn = open_db(&path).unwrap();
        let persistence =
            BoardPersistence::new(SqliteSnapshotRepository::try_new(&conn).unwrap(), "slot");
        persistence.save(&board).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let persistence =
        BoardPersistence::new(SqliteSnapshotRepository::try_new(&conn).unwrap(), "slot");
    assert_eq!(persistence.load(), board);
}

#[test]
fn open_refuses_database_from_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaMismatch { expected, found }
            if expected == SCHEMA_VERSION && found == SCHEMA_VERSION + 1
    ));
}
