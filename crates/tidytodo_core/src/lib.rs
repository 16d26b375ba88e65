//! Core domain logic for the TidyTodo app.
//! The UI layer observes stores and requests mutations; it never owns state.

pub mod app;
pub mod config;
pub mod db;
pub mod flags;
pub mod logging;
pub mod model;
pub mod reactive;
pub mod service;
pub mod storage;

pub use app::{AppError, AppResult, TodoApp};
pub use config::{AppConfig, ConfigError, LoggingConfig, RemoteConfigSettings, StorageConfig};
pub use flags::http::HttpRemoteConfigProvider;
pub use flags::provider::{FetchError, RawFlagValues, RemoteConfigProvider};
pub use flags::source::FlagSource;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId, CreateCategoryDto, UpdateCategoryDto};
pub use model::flags::{FeatureFlags, FlagName, FlagValue};
pub use model::todo::{CreateTodoDto, FilterType, Todo, TodoId, TodoStats, UpdateTodoDto};
pub use model::validation::{ValidationError, ValidationLimits};
pub use reactive::{SnapshotSubject, SubscriptionId};
pub use service::category_store::CategoryStore;
pub use service::error::{StoreError, StoreResult};
pub use service::todo_query::{compute_stats, filter_todos};
pub use service::todo_store::TodoStore;
pub use storage::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
