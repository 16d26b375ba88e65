//! Application configuration.
//!
//! # Responsibility
//! - Hold storage keys, validation limits and remote-config settings.
//! - Load them from a JSON document, filling omitted fields with defaults.
//!
//! # Invariants
//! - `AppConfig::default()` is a complete, usable configuration.
//! - A missing config file is not an error.

use crate::logging::default_log_level;
use crate::model::validation::ValidationLimits;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_TODOS_KEY: &str = "todos";
pub const DEFAULT_CATEGORIES_KEY: &str = "categories";
pub const DEFAULT_REMOTE_CONFIG_BASE_URL: &str = "https://firebaseremoteconfig.googleapis.com";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "TODO App".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

/// Storage keys and first-run behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub todos_key: String,
    pub categories_key: String,
    /// Write sample todos/categories on first run.
    pub seed_sample_data: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            todos_key: DEFAULT_TODOS_KEY.to_string(),
            categories_key: DEFAULT_CATEGORIES_KEY.to_string(),
            seed_sample_data: true,
        }
    }
}

/// Connection settings for the remote flag provider.
///
/// Empty `project_id` or `api_key` means "not configured": the flag source
/// then serves defaults without touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfigSettings {
    pub base_url: String,
    pub project_id: String,
    pub api_key: String,
    pub app_id: String,
    pub fetch_timeout_ms: u64,
    pub minimum_fetch_interval_ms: u64,
}

impl Default for RemoteConfigSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_CONFIG_BASE_URL.to_string(),
            project_id: String::new(),
            api_key: String::new(),
            app_id: String::new(),
            fetch_timeout_ms: 60_000,
            minimum_fetch_interval_ms: 3_600_000,
        }
    }
}

impl RemoteConfigSettings {
    pub fn is_configured(&self) -> bool {
        let placeholder = |value: &str| {
            let trimmed = value.trim();
            trimmed.is_empty() || trimmed.starts_with("YOUR_")
        };
        !placeholder(&self.project_id) && !placeholder(&self.api_key)
    }
}

/// File logging settings. Logging stays off while `dir` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppInfo,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub validation: ValidationLimits,
    pub remote_config: RemoteConfigSettings,
}

impl AppConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Reads `path`; returns defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, RemoteConfigSettings};

    #[test]
    fn partial_document_keeps_defaults_for_omitted_fields() {
        let config = AppConfig::from_json_str(
            r#"{ "storage": { "seed_sample_data": false }, "validation": { "max_title_length": 60, "utc_offset_minutes": -300 } }"#,
        )
        .unwrap();

        assert!(!config.storage.seed_sample_data);
        assert_eq!(config.storage.todos_key, "todos");
        assert_eq!(config.validation.max_title_length, 60);
        assert_eq!(config.validation.min_title_length, 3);
        assert_eq!(config.validation.utc_offset_minutes, -300);
        assert_eq!(config.remote_config.fetch_timeout_ms, 60_000);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn placeholder_credentials_are_not_configured() {
        let mut settings = RemoteConfigSettings::default();
        assert!(!settings.is_configured());

        settings.project_id = "YOUR_PROJECT_ID_HERE".to_string();
        settings.api_key = "key".to_string();
        assert!(!settings.is_configured());

        settings.project_id = "todo-app".to_string();
        assert!(settings.is_configured());
    }
}
