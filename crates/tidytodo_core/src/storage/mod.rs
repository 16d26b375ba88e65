//! Local key-value storage.
//!
//! # Responsibility
//! - Persist whole JSON values under string keys.
//! - Keep SQLite details behind the `KeyValueStore` contract so stores can
//!   run against an in-memory map in tests.
//!
//! # Invariants
//! - A `set` replaces the previous value for the key atomically.
//! - The store never interprets value shape; schema belongs to callers.

pub mod kv_store;
