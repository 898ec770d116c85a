use rusqlite::Connection;
use studyflow_core::db::migrations::latest_version;
use studyflow_core::db::{open_db, open_db_in_memory, DbError};
use studyflow_core::{KvBackend, RepoError, SqliteKvBackend};

#[test]
fn fresh_database_is_migrated_and_immediately_usable() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(user_version(&conn), latest_version());

    // The KV table exists and accepts snapshots right away.
    let backend = SqliteKvBackend::try_new(&conn).unwrap();
    backend.save("courses", "[]").unwrap();
    assert_eq!(backend.load("courses").unwrap().as_deref(), Some("[]"));
}

#[test]
fn reopening_a_migrated_file_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("organizer.db");

    drop(open_db(&path).unwrap());

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    assert!(SqliteKvBackend::try_new(&conn).is_ok());
}

#[test]
fn database_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("organizer.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 41;")
        .unwrap();

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 41);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn backend_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKvBackend::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(actual_version, 0);
            assert_eq!(expected_version, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection must be rejected"),
    }
}

#[test]
fn backend_rejects_connection_without_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKvBackend::try_new(&conn),
        Err(RepoError::MissingRequiredTable("kv_entries"))
    ));
}

#[test]
fn backend_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE kv_entries (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL);
         PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();

    assert!(matches!(
        SqliteKvBackend::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "kv_entries",
            column: "updated_at"
        })
    ));
}

#[test]
fn save_is_an_upsert_per_key() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteKvBackend::try_new(&conn).unwrap();

    assert_eq!(backend.load("courses").unwrap(), None);

    backend.save("courses", "[1]").unwrap();
    backend.save("courses", "[1,2]").unwrap();
    backend.save("tasks", "[]").unwrap();

    assert_eq!(backend.load("courses").unwrap().as_deref(), Some("[1,2]"));
    assert_eq!(backend.load("tasks").unwrap().as_deref(), Some("[]"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 2);
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
