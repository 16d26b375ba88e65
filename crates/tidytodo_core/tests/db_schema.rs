use rusqlite::Connection;
use tidytodo_core::db::{open_db, open_db_in_memory, user_version, DbError, SCHEMA_VERSION};
use tidytodo_core::{KeyValueStore, SqliteKeyValueStore};

#[test]
fn open_db_in_memory_creates_kv_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn).unwrap(), SCHEMA_VERSION);
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn values_survive_reopening_the_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tidytodo.db");

    let first = open_db(&path).unwrap();
    SqliteKeyValueStore::new(&first)
        .set("todos", &serde_json::json!([{"id": "a"}]))
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(user_version(&second).unwrap(), SCHEMA_VERSION);
    let stored = SqliteKeyValueStore::new(&second).get("todos").unwrap();
    assert_eq!(stored, Some(serde_json::json!([{"id": "a"}])));
}

#[test]
fn unversioned_file_with_existing_table_keeps_its_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_entries (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL, updated_at INTEGER NOT NULL DEFAULT 0);
         INSERT INTO kv_entries (key, value) VALUES ('categories', '[]');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();

    assert_eq!(user_version(&conn).unwrap(), SCHEMA_VERSION);
    let stored = SqliteKeyValueStore::new(&conn).get("categories").unwrap();
    assert_eq!(stored, Some(serde_json::json!([])));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
