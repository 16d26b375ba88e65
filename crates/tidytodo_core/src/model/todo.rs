//! Todo domain model.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `updated_at` is restamped on every mutation.
//! - The model accepts any title; title rules live in `model::validation`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type TodoId = String;

/// One task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    /// May reference a category that no longer exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Todo {
    /// Builds a pending todo from a create request with a generated id.
    pub fn from_dto(dto: CreateTodoDto, now_ms: i64) -> Self {
        Self {
            id: super::generate_id(),
            title: dto.title,
            description: dto.description,
            completed: false,
            due_date: dto.due_date,
            category_id: dto.category_id,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Merges the fields present in `patch` and restamps `updated_at`.
    pub fn apply(&mut self, patch: UpdateTodoDto, now_ms: i64) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        self.updated_at = now_ms;
    }

    /// Case-insensitive substring match against title or description.
    ///
    /// `lowered_term` must already be lowercase.
    pub(crate) fn matches_term(&self, lowered_term: &str) -> bool {
        self.title.to_lowercase().contains(lowered_term)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(lowered_term))
    }
}

/// Request to create a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTodoDto {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<i64>,
    pub category_id: Option<String>,
}

impl CreateTodoDto {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a todo.
///
/// `None` leaves a field untouched. For optional fields, `Some(None)` clears
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTodoDto {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<i64>>,
    pub category_id: Option<Option<String>>,
}

impl UpdateTodoDto {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Completion-status filter applied by `filter_todos`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    #[default]
    All,
    Pending,
    Completed,
}

impl FilterType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub(crate) fn admits(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl Display for FilterType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unsupported filter `{other}`; expected all|pending|completed"
            )),
        }
    }
}

/// Counts over one todo snapshot. `pending == total - completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Todos written on first run.
pub fn sample_todos() -> Vec<CreateTodoDto> {
    vec![
        CreateTodoDto {
            title: "Welcome to your to-do list".to_string(),
            description: Some("Tap a task to edit it".to_string()),
            ..CreateTodoDto::default()
        },
        CreateTodoDto::titled("Mark a task as done"),
        CreateTodoDto {
            title: "Group tasks with categories".to_string(),
            description: Some("Pick a color for each category".to_string()),
            ..CreateTodoDto::default()
        },
        CreateTodoDto::titled("Clear completed tasks"),
    ]
}

#[cfg(test)]
mod tests {
    use super::{CreateTodoDto, FilterType, Todo, UpdateTodoDto};

    #[test]
    fn apply_keeps_untouched_fields_and_clears_explicit_none() {
        let mut todo = Todo::from_dto(
            CreateTodoDto {
                title: "Write report".to_string(),
                description: Some("quarterly".to_string()),
                due_date: Some(10),
                category_id: Some("work".to_string()),
            },
            100,
        );

        todo.apply(
            UpdateTodoDto {
                category_id: Some(None),
                ..UpdateTodoDto::default()
            },
            200,
        );

        assert_eq!(todo.description.as_deref(), Some("quarterly"));
        assert_eq!(todo.due_date, Some(10));
        assert_eq!(todo.category_id, None);
        assert_eq!(todo.created_at, 100);
        assert_eq!(todo.updated_at, 200);
    }

    #[test]
    fn serializes_with_camel_case_and_omits_empty_optionals() {
        let todo = Todo::from_dto(CreateTodoDto::titled("Call mom"), 5);
        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(json["createdAt"], 5);
        assert_eq!(json["completed"], false);
        assert!(json.get("dueDate").is_none());
        assert!(json.get("categoryId").is_none());
    }

    #[test]
    fn filter_type_parses_case_insensitively() {
        assert_eq!(" Pending ".parse::<FilterType>().unwrap(), FilterType::Pending);
        assert!("done".parse::<FilterType>().is_err());
        assert_eq!(FilterType::Completed.to_string(), "completed");
    }
}
