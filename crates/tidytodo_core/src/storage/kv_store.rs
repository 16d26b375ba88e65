//! Key-value store contract with SQLite and in-memory implementations.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while reading or writing stored values.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying SQLite failure.
    Db(DbError),
    /// Stored text is not valid JSON, or a value failed to encode.
    Json {
        key: String,
        source: serde_json::Error,
    },
    /// Backend refused the operation (used by non-SQLite backends).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Json { key, source } => {
                write!(f, "invalid JSON value for key `{key}`: {source}")
            }
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Json { source, .. } => Some(source),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistent string-keyed store of JSON values.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<Value>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &Value) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
///
/// The connection must come from `open_db`/`open_db_in_memory` so the table
/// exists. The handle is `Copy`, so several stores can share one connection.
#[derive(Clone, Copy)]
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StorageError::Json {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> StorageResult<()> {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;

        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, text],
        )?;
        Ok(())
    }
}

/// In-memory key-value store.
///
/// Clones share the same map, which lets tests re-open stores over data
/// written by an earlier instance.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a value exists for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}
