use autoshop_core::db::migrations::latest_version;
use autoshop_core::db::Store;
use autoshop_core::DbError;
use rusqlite::Connection;

#[test]
fn in_memory_store_is_fully_migrated() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.connection();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    for table in ["appointments", "invoices"] {
        let exists: i64 = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(exists, 1, "missing table {table}");
    }
}

#[test]
fn foreign_keys_pragma_is_enabled() {
    let store = Store::open_in_memory().unwrap();
    let enabled: i64 = store
        .connection()
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn file_store_reopen_is_idempotent_and_durable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.db");

    {
        let store = Store::open(&path).unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO appointments
                 (client_name, email, service_type, date, created_at, status)
                 VALUES ('Juan', 'juan@test.com', 'oil_change',
                         '2025-10-15', '2025-10-02T14:00:00', 'confirmed');",
                [],
            )
            .unwrap();
    }

    let reopened = Store::open(&path).unwrap();
    let count: i64 = reopened
        .connection()
        .query_row("SELECT COUNT(*) FROM appointments;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_versions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    }

    let err = Store::open(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 99,
            ..
        }
    ));
}

#[test]
fn direct_orphan_invoice_insert_is_rejected_by_the_schema() {
    let store = Store::open_in_memory().unwrap();
    let result = store.connection().execute(
        "INSERT INTO invoices (appointment_id, amount, issued_at, paid)
         VALUES (42, 10.0, '2025-10-02T14:00:00', 0);",
        [],
    );
    assert!(result.is_err());
}
