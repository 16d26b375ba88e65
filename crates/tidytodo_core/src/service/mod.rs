//! Stores that own the todo and category lists.
//!
//! # Responsibility
//! - Keep one in-memory snapshot per list and mirror it to key-value storage.
//! - Publish every committed snapshot to subscribers.
//! - Provide pure filter/stat queries over todo snapshots.
//!
//! # Invariants
//! - Each store is the only writer of its storage key.
//! - A snapshot is published only after its write succeeded.

pub mod category_store;
pub mod error;
mod persisted_list;
pub mod todo_query;
pub mod todo_store;
