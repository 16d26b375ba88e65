//! Remote feature flags.
//!
//! # Responsibility
//! - Fetch the four remote flags through a pluggable provider.
//! - Publish one flag snapshot, falling back to defaults on any failure.
//!
//! # Invariants
//! - Fetch failures reach `FlagSource` callers only through `fetch_flags`;
//!   `initialize` and `refresh` fall back to defaults.
//! - One fetch attempt per `initialize`/`refresh` call; no retries.

pub mod http;
pub mod provider;
pub mod source;
