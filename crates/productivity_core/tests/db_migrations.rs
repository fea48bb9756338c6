use productivity_core::db::{find_model, open_db, open_db_in_memory, DbError, NOTES_MODEL};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let model = find_model(NOTES_MODEL).unwrap();
    let conn = open_db_in_memory(model).unwrap();

    assert_eq!(schema_version(&conn), model.latest_version());
    assert_table_exists(&conn, "notes");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let model = find_model(NOTES_MODEL).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");

    let conn_first = open_db(&path, model).unwrap();
    assert_eq!(schema_version(&conn_first), model.latest_version());
    drop(conn_first);

    let conn_second = open_db(&path, model).unwrap();
    assert_eq!(schema_version(&conn_second), model.latest_version());
    assert_table_exists(&conn_second, "notes");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let model = find_model(NOTES_MODEL).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path, model).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            model: name,
            db_version,
            latest_supported,
        } => {
            assert_eq!(name, NOTES_MODEL);
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, model.latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn newer_schema_error_names_model_and_both_versions() {
    let err = DbError::UnsupportedSchemaVersion {
        model: NOTES_MODEL,
        db_version: 7,
        latest_supported: 1,
    };

    assert_eq!(
        err.to_string(),
        "database has `NotesStore` schema v7; this build reads up to v1"
    );
}

#[test]
fn notes_table_has_primary_key_on_id() {
    let model = find_model(NOTES_MODEL).unwrap();
    let conn = open_db_in_memory(model).unwrap();

    let pk_column: String = conn
        .query_row(
            "SELECT name FROM pragma_table_info('notes') WHERE pk = 1;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(pk_column, "id");
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
