//! Pure queries over todo snapshots.
//!
//! # Invariants
//! - Filters only narrow; relative order of the input is preserved.
//! - Passes run in fixed order: status, category, search term.

use crate::model::todo::{FilterType, Todo, TodoStats};

/// Narrows `todos` by status, then category, then search term.
///
/// - `category_id`: ignored when `None` or empty.
/// - `search_term`: trimmed; ignored when blank; matched case-insensitively
///   against title or description.
pub fn filter_todos(
    todos: &[Todo],
    search_term: &str,
    filter_type: FilterType,
    category_id: Option<&str>,
) -> Vec<Todo> {
    let category_id = category_id.filter(|id| !id.is_empty());
    let term = search_term.trim().to_lowercase();

    todos
        .iter()
        .filter(|todo| filter_type.admits(todo))
        .filter(|todo| category_id.map_or(true, |id| todo.category_id.as_deref() == Some(id)))
        .filter(|todo| term.is_empty() || todo.matches_term(&term))
        .cloned()
        .collect()
}

pub fn compute_stats(todos: &[Todo]) -> TodoStats {
    let total = todos.len();
    let completed = todos.iter().filter(|todo| todo.completed).count();
    TodoStats {
        total,
        completed,
        pending: total - completed,
    }
}
