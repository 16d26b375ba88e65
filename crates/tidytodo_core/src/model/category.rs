//! Category domain model.
//!
//! Categories are named, colored tags. Todos reference them by id without
//! any integrity check.

use serde::{Deserialize, Serialize};

pub type CategoryId = String;

/// Swatch tokens offered by the category picker.
pub const CATEGORY_SWATCHES: &[&str] = &[
    "#3498db", "#2ecc71", "#e74c3c", "#f39c12", "#9b59b6", "#1abc9c", "#34495e", "#e67e22",
    "#c0392b", "#16a085",
];

/// Default swatch for a new category.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3498db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Category {
    pub fn from_dto(dto: CreateCategoryDto, now_ms: i64) -> Self {
        Self {
            id: super::generate_id(),
            name: dto.name,
            color: dto.color,
            description: dto.description,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Merges the fields present in `patch` and restamps `updated_at`.
    pub fn apply(&mut self, patch: UpdateCategoryDto, now_ms: i64) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = now_ms;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCategoryDto {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

impl Default for CreateCategoryDto {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
            description: None,
        }
    }
}

impl CreateCategoryDto {
    /// Request with the default swatch.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a category. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCategoryDto {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<Option<String>>,
}

/// Categories written on first run.
pub fn sample_categories() -> Vec<CreateCategoryDto> {
    vec![
        CreateCategoryDto::named("Work").with_description("Work related tasks"),
        CreateCategoryDto::new("Personal", "#2ecc71").with_description("Personal tasks"),
        CreateCategoryDto::new("Shopping", "#e74c3c").with_description("Shopping list"),
        CreateCategoryDto::new("Health", "#f39c12").with_description("Health and exercise"),
    ]
}
