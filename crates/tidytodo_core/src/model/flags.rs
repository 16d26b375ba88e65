//! Feature flag snapshot.
//!
//! # Invariants
//! - A snapshot always carries all four flags; missing remote values are
//!   filled from `FeatureFlags::default()` at coercion time.
//! - Snapshots are replaced wholesale, never patched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub categories_enabled: bool,
    pub enable_notifications: bool,
    pub maintenance_mode: bool,
    pub max_todos_per_user: i64,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            categories_enabled: true,
            enable_notifications: true,
            maintenance_mode: false,
            max_todos_per_user: 100,
        }
    }
}

/// Known remote flag keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagName {
    CategoriesEnabled,
    EnableNotifications,
    MaintenanceMode,
    MaxTodosPerUser,
}

impl FlagName {
    pub const ALL: [FlagName; 4] = [
        Self::CategoriesEnabled,
        Self::EnableNotifications,
        Self::MaintenanceMode,
        Self::MaxTodosPerUser,
    ];

    /// Remote key, as configured in the remote config console.
    pub fn key(self) -> &'static str {
        match self {
            Self::CategoriesEnabled => "categoriesEnabled",
            Self::EnableNotifications => "enableNotifications",
            Self::MaintenanceMode => "maintenanceMode",
            Self::MaxTodosPerUser => "maxTodosPerUser",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.key() == key)
    }
}

/// A single flag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
}

impl FlagValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(value),
            Self::Int(_) => None,
        }
    }

    pub fn as_int(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            Self::Bool(_) => None,
        }
    }
}

impl Display for FlagValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl FeatureFlags {
    pub fn get(&self, name: FlagName) -> FlagValue {
        match name {
            FlagName::CategoriesEnabled => FlagValue::Bool(self.categories_enabled),
            FlagName::EnableNotifications => FlagValue::Bool(self.enable_notifications),
            FlagName::MaintenanceMode => FlagValue::Bool(self.maintenance_mode),
            FlagName::MaxTodosPerUser => FlagValue::Int(self.max_todos_per_user),
        }
    }

    /// Builds a snapshot from raw remote strings.
    ///
    /// Booleans are true for `"true"` or `"1"` (trimmed, case-insensitive).
    /// The integer falls back to its default when absent or unparsable, and
    /// so does any absent boolean.
    pub fn from_raw(raw: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let flag_bool = |name: FlagName, default: bool| {
            raw.get(name.key())
                .map_or(default, |value| coerce_bool(value))
        };

        Self {
            categories_enabled: flag_bool(FlagName::CategoriesEnabled, defaults.categories_enabled),
            enable_notifications: flag_bool(
                FlagName::EnableNotifications,
                defaults.enable_notifications,
            ),
            maintenance_mode: flag_bool(FlagName::MaintenanceMode, defaults.maintenance_mode),
            max_todos_per_user: raw
                .get(FlagName::MaxTodosPerUser.key())
                .and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(defaults.max_todos_per_user),
        }
    }
}

fn coerce_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}
