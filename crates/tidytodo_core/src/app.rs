//! Application composition root.
//!
//! # Responsibility
//! - Build the stores and the flag source from explicit collaborators.
//! - Apply form validation and feature-flag guards before store mutations.
//!
//! # Invariants
//! - Stores are only mutated through this facade by UI callers.
//! - While `maintenanceMode` is on, every mutation is refused.
//! - Validation runs before any write; stores themselves never validate.

use crate::config::AppConfig;
use crate::flags::provider::RemoteConfigProvider;
use crate::flags::source::FlagSource;
use crate::model::category::{Category, CreateCategoryDto, UpdateCategoryDto};
use crate::model::flags::FeatureFlags;
use crate::model::now_epoch_ms;
use crate::model::todo::{CreateTodoDto, FilterType, Todo, TodoStats, UpdateTodoDto};
use crate::model::validation::{
    validate_create_category, validate_create_todo, validate_update_category,
    validate_update_todo, ValidationError,
};
use crate::service::category_store::CategoryStore;
use crate::service::error::StoreError;
use crate::service::todo_store::TodoStore;
use crate::storage::kv_store::KeyValueStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Store(StoreError),
    /// Remote `maintenanceMode` flag is on.
    MaintenanceMode,
    /// Creating another todo would exceed `maxTodosPerUser`.
    TodoLimitReached { limit: i64 },
    /// Remote `categoriesEnabled` flag is off.
    CategoriesDisabled,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::MaintenanceMode => write!(f, "the app is in maintenance mode"),
            Self::TodoLimitReached { limit } => {
                write!(f, "todo limit reached ({limit})")
            }
            Self::CategoriesDisabled => write!(f, "categories are disabled"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Explicitly composed application state.
pub struct TodoApp<S, P>
where
    S: KeyValueStore + Clone,
    P: RemoteConfigProvider,
{
    config: AppConfig,
    todos: TodoStore<S>,
    categories: CategoryStore<S>,
    flags: FlagSource<P>,
}

impl<S, P> TodoApp<S, P>
where
    S: KeyValueStore + Clone,
    P: RemoteConfigProvider,
{
    /// Opens both stores over `storage` and initializes the flag source.
    pub fn open(storage: S, provider: P, config: AppConfig) -> AppResult<Self> {
        let todos = TodoStore::open(storage.clone(), &config.storage)?;
        let categories = CategoryStore::open(storage, &config.storage)?;
        let mut flags = FlagSource::new(provider);
        flags.initialize();

        info!(
            "event=app_open module=app status=ok app={} version={} todos={} categories={}",
            config.app.name,
            config.app.version,
            todos.len(),
            categories.len()
        );
        Ok(Self {
            config,
            todos,
            categories,
            flags,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn todos(&self) -> &TodoStore<S> {
        &self.todos
    }

    pub fn categories(&self) -> &CategoryStore<S> {
        &self.categories
    }

    pub fn flags(&self) -> &FlagSource<P> {
        &self.flags
    }

    pub fn feature_flags(&self) -> FeatureFlags {
        self.flags.snapshot()
    }

    pub fn refresh_flags(&mut self) {
        self.flags.refresh();
    }

    pub fn create_todo(&mut self, dto: CreateTodoDto) -> AppResult<Todo> {
        let flags = self.ensure_writable("create_todo")?;
        let limit = flags.max_todos_per_user;
        if limit > 0 && self.todos.len() as i64 >= limit {
            warn!(
                "event=create_todo module=app status=rejected error_code=todo_limit_reached limit={}",
                limit
            );
            return Err(AppError::TodoLimitReached { limit });
        }

        let dto = CreateTodoDto {
            title: dto.title.trim().to_string(),
            description: normalize_optional_text(dto.description),
            ..dto
        };
        validate_create_todo(&dto, &self.config.validation, now_epoch_ms())?;
        Ok(self.todos.create(dto)?)
    }

    pub fn update_todo(&mut self, id: &str, patch: UpdateTodoDto) -> AppResult<Todo> {
        self.ensure_writable("update_todo")?;
        let patch = UpdateTodoDto {
            title: patch.title.map(|title| title.trim().to_string()),
            description: patch.description.map(normalize_optional_text),
            ..patch
        };
        validate_update_todo(&patch, &self.config.validation, now_epoch_ms())?;
        Ok(self.todos.update(id, patch)?)
    }

    pub fn toggle_todo(&mut self, id: &str) -> AppResult<Todo> {
        self.ensure_writable("toggle_todo")?;
        Ok(self.todos.toggle(id)?)
    }

    pub fn remove_todo(&mut self, id: &str) -> AppResult<()> {
        self.ensure_writable("remove_todo")?;
        Ok(self.todos.remove(id)?)
    }

    pub fn clear_completed(&mut self) -> AppResult<()> {
        self.ensure_writable("clear_completed")?;
        Ok(self.todos.clear_completed()?)
    }

    pub fn stats(&self) -> TodoStats {
        self.todos.stats()
    }

    /// Filtered view of the current todos.
    ///
    /// The category filter is ignored while categories are disabled.
    pub fn visible_todos(
        &self,
        search_term: &str,
        filter_type: FilterType,
        category_id: Option<&str>,
    ) -> Vec<Todo> {
        let category_id = if self.flags.snapshot().categories_enabled {
            category_id
        } else {
            None
        };
        self.todos.filter(search_term, filter_type, category_id)
    }

    pub fn create_category(&mut self, dto: CreateCategoryDto) -> AppResult<Category> {
        self.ensure_categories_writable("create_category")?;
        let dto = CreateCategoryDto {
            name: dto.name.trim().to_string(),
            description: normalize_optional_text(dto.description),
            ..dto
        };
        validate_create_category(&dto)?;
        Ok(self.categories.create(dto)?)
    }

    pub fn update_category(&mut self, id: &str, patch: UpdateCategoryDto) -> AppResult<Category> {
        self.ensure_categories_writable("update_category")?;
        let patch = UpdateCategoryDto {
            name: patch.name.map(|name| name.trim().to_string()),
            description: patch.description.map(normalize_optional_text),
            ..patch
        };
        validate_update_category(&patch)?;
        Ok(self.categories.update(id, patch)?)
    }

    /// Deletes a category; todos keep their (now dangling) reference.
    pub fn delete_category(&mut self, id: &str) -> AppResult<()> {
        self.ensure_categories_writable("delete_category")?;
        Ok(self.categories.delete(id)?)
    }

    fn ensure_writable(&self, operation: &str) -> AppResult<FeatureFlags> {
        let flags = self.flags.snapshot();
        if flags.maintenance_mode {
            warn!(
                "event={} module=app status=rejected error_code=maintenance_mode",
                operation
            );
            return Err(AppError::MaintenanceMode);
        }
        Ok(flags)
    }

    fn ensure_categories_writable(&self, operation: &str) -> AppResult<()> {
        let flags = self.ensure_writable(operation)?;
        if !flags.categories_enabled {
            warn!(
                "event={} module=app status=rejected error_code=categories_disabled",
                operation
            );
            return Err(AppError::CategoriesDisabled);
        }
        Ok(())
    }
}

fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
