//! Shape of the `kv_entries` table.
//!
//! # Invariants
//! - After a successful `ensure_schema`, `PRAGMA user_version` equals
//!   `SCHEMA_VERSION`.
//! - Table creation is idempotent; an up-to-date database is not written.
//! - Stored JSON blobs are never rewritten here.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// Schema version this binary reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

const KV_ENTRIES_DDL: &str = "
CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Brings an older or empty database up to `SCHEMA_VERSION`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   binary.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let found = user_version(conn)?;
    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Greater => Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: SCHEMA_VERSION,
        }),
        Ordering::Equal => Ok(()),
        Ordering::Less => {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(KV_ENTRIES_DDL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;

            info!(
                "event=db_schema module=db status=ok from_version={} to_version={}",
                found, SCHEMA_VERSION
            );
            Ok(())
        }
    }
}

/// Reads `PRAGMA user_version`.
pub fn user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, user_version, SCHEMA_VERSION};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn fresh_connection_is_brought_to_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(user_version(&conn).unwrap(), 0);

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        assert_eq!(user_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn newer_version_is_refused_without_writes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();

        let err = ensure_schema(&conn).unwrap_err();

        assert!(matches!(
            err,
            DbError::UnsupportedSchemaVersion { db_version, .. } if db_version == SCHEMA_VERSION + 1
        ));
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'kv_entries';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }
}
