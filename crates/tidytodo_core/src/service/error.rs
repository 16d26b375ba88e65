//! Store error taxonomy.

use crate::storage::kv_store::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// No todo has the requested id.
    TodoNotFound(String),
    /// No category has the requested id.
    CategoryNotFound(String),
    /// Persisting the new snapshot failed; the previous snapshot is kept.
    Storage(StorageError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TodoNotFound(_) | Self::CategoryNotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::TodoNotFound(_) | Self::CategoryNotFound(_) => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
