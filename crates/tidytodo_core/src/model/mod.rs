//! Domain model for the to-do application.
//!
//! # Responsibility
//! - Define the records owned by the todo and category stores.
//! - Define the feature-flag snapshot and the request DTOs.
//!
//! # Invariants
//! - Every record is identified by a stable string id generated at creation.
//! - Timestamps are Unix epoch milliseconds.
//! - Serialized field names are camelCase.

pub mod category;
pub mod flags;
pub mod todo;
pub mod validation;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

/// Generates a fresh record id.
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
