//! Whole-list JSON persistence shared by the stores.

use crate::storage::kv_store::{KeyValueStore, StorageError};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Result of reading one list key at store open.
#[derive(Debug)]
pub(crate) enum LoadedList<T> {
    /// Key was never written.
    Missing,
    /// Key holds a list (possibly empty).
    Items(Vec<T>),
    /// Read or decode failed; callers treat this as empty and must not seed.
    Unreadable,
}

pub(crate) fn load_list<T, S>(storage: &S, key: &str, module: &str) -> LoadedList<T>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    let value = match storage.get(key) {
        Ok(Some(Value::Null)) | Ok(None) => return LoadedList::Missing,
        Ok(Some(value)) => value,
        Err(err) => {
            error!(
                "event=store_load module={} status=error key={} error_code=storage_read_failed error={}",
                module, key, err
            );
            return LoadedList::Unreadable;
        }
    };

    match serde_json::from_value::<Vec<T>>(value) {
        Ok(items) => LoadedList::Items(items),
        Err(err) => {
            warn!(
                "event=store_load module={} status=error key={} error_code=invalid_blob error={}",
                module, key, err
            );
            LoadedList::Unreadable
        }
    }
}

/// Writes the full list under `key` as one JSON array.
pub(crate) fn save_list<T, S>(
    storage: &S,
    key: &str,
    items: &[T],
    module: &str,
) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore,
{
    let value = serde_json::to_value(items).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;

    storage.set(key, &value).map_err(|err| {
        error!(
            "event=store_save module={} status=error key={} items={} error_code=storage_write_failed error={}",
            module,
            key,
            items.len(),
            err
        );
        err
    })
}
