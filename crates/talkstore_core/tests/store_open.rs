use rusqlite::Connection;
use talkstore_core::db::migrations::latest_version;
use talkstore_core::{DbError, TalkStore};

#[test]
fn open_creates_all_catalog_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tedtalks.sqlite");

    let store = TalkStore::open(&path).unwrap();
    assert_eq!(store.path(), Some(path.as_path()));
    drop(store);

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    for table in ["speaker", "topic", "speech", "review"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_a_store_keeps_its_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tedtalks.sqlite");

    let first = TalkStore::open(&path).unwrap();
    let speaker = first.insert_speaker("Speaker A").unwrap();
    drop(first);

    let second = TalkStore::open(&path).unwrap();
    assert_eq!(second.get_speaker_by_id(speaker.speaker_id).unwrap(), Some(speaker));
    assert_eq!(second.get_all_speakers().unwrap().len(), 1);
}

#[test]
fn opening_store_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match TalkStore::open(&path) {
        Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be rejected"),
    }
}

#[test]
fn opening_store_in_missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tedtalks.sqlite");

    match TalkStore::open(&path) {
        Err(DbError::Open { path: reported, .. }) => assert_eq!(reported, path),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("store in a missing directory must not open"),
    }
}

#[test]
fn memory_location_serves_reads_from_the_writer() {
    let store = TalkStore::open(":memory:").unwrap();
    assert!(store.path().is_none());

    let speaker = store.insert_speaker("Speaker A").unwrap();
    assert_eq!(store.get_all_speakers().unwrap(), vec![speaker.clone()]);
    assert_eq!(
        store.get_speaker_by_name("Speaker A").unwrap(),
        Some(speaker)
    );
}

#[test]
fn file_store_runs_in_wal_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tedtalks.sqlite");
    let _store = TalkStore::open(&path).unwrap();

    let conn = Connection::open(&path).unwrap();
    let journal_mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(journal_mode.to_ascii_lowercase(), "wal");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
