use rusqlite::Connection;
use ticklist_core::db::migrations::latest_version;
use ticklist_core::db::open_db_in_memory;
use ticklist_core::{
    RepoError, SnapshotRepository, SqliteSnapshotRepository, Task, TaskId, SNAPSHOT_KEY,
};

#[test]
fn load_without_snapshot_returns_empty_sequence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    assert!(repo.load_tasks().unwrap().is_empty());
}

#[test]
fn save_then_load_preserves_ids_text_done_and_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    let tasks = vec![
        Task::with_id(TaskId::new("t-3"), "read book", false),
        Task::with_id(TaskId::new("t-2"), "walk dog", true),
        Task::with_id(TaskId::new("t-1"), "buy milk", false),
    ];
    repo.save_tasks(&tasks).unwrap();

    let loaded = repo.load_tasks().unwrap();
    assert_eq!(loaded, tasks);
}

#[test]
fn save_overwrites_prior_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    repo.save_tasks(&[Task::with_id(TaskId::new("t-1"), "first", false)])
        .unwrap();
    repo.save_tasks(&[Task::with_id(TaskId::new("t-2"), "second", false)])
        .unwrap();

    let loaded = repo.load_tasks().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, TaskId::new("t-2"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1, "full-snapshot writes must reuse the fixed key");
}

#[test]
fn persisted_value_is_a_json_array_of_wire_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    repo.save_tasks(&[Task::with_id(TaskId::new("t-1"), "walk dog", true)])
        .unwrap();

    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [SNAPSHOT_KEY],
            |row| row.get(0),
        )
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "t-1");
    assert_eq!(records[0]["text"], "walk dog");
    assert_eq!(records[0]["done"], true);
}

#[test]
fn load_accepts_ids_written_by_foreign_generators() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    // Ids are opaque text in the wire contract; a timestamp-random id from
    // an earlier implementation must stay loadable.
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2);",
        [
            SNAPSHOT_KEY,
            r#"[{"id":"1690000000000-ab12cd","text":"legacy task","done":false}]"#,
        ],
    )
    .unwrap();

    let loaded = repo.load_tasks().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, TaskId::new("1690000000000-ab12cd"));
}

#[test]
fn load_rejects_unparseable_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2);",
        [SNAPSHOT_KEY, "{not json"],
    )
    .unwrap();

    let err = repo.load_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn load_rejects_wrong_shape() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2);",
        [SNAPSHOT_KEY, r#"{"id":"t-1","text":"not an array","done":false}"#],
    )
    .unwrap();

    let err = repo.load_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn load_rejects_duplicate_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2);",
        [
            SNAPSHOT_KEY,
            r#"[{"id":"t-1","text":"a","done":false},{"id":"t-1","text":"b","done":true}]"#,
        ],
    )
    .unwrap();

    let err = repo.load_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn validation_failure_blocks_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    let invalid = Task::with_id(TaskId::new("t-1"), "   ", false);
    let err = repo.save_tasks(&[invalid]).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    assert!(repo.load_tasks().unwrap().is_empty());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteSnapshotRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteSnapshotRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("kv_store"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteSnapshotRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "kv_store",
            column: "updated_at"
        })
    ));
}
