//! Todo store.
//!
//! # Responsibility
//! - Own the todo snapshot and mirror it to one storage key.
//! - Expose CRUD, toggle, clear-completed, stats and filtering.
//!
//! # Invariants
//! - Every mutation writes the full list before replacing the snapshot.
//! - A failed write leaves the snapshot and subscribers untouched.
//! - `id` and `created_at` are preserved across updates.
//! - No title validation happens here.

use crate::config::StorageConfig;
use crate::model::now_epoch_ms;
use crate::model::todo::{
    sample_todos, CreateTodoDto, FilterType, Todo, TodoStats, UpdateTodoDto,
};
use crate::reactive::{SnapshotSubject, SubscriptionId};
use crate::service::error::{StoreError, StoreResult};
use crate::service::persisted_list::{load_list, save_list, LoadedList};
use crate::service::todo_query::{compute_stats, filter_todos};
use crate::storage::kv_store::KeyValueStore;
use log::{debug, info};

const MODULE: &str = "todo_store";

pub struct TodoStore<S: KeyValueStore> {
    storage: S,
    key: String,
    subject: SnapshotSubject<Vec<Todo>>,
    clock: fn() -> i64,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Loads the persisted list, seeding samples on first run when enabled.
    ///
    /// A storage read failure is logged and yields an empty store. Seeding
    /// errors are returned because they are writes.
    pub fn open(storage: S, config: &StorageConfig) -> StoreResult<Self> {
        Self::open_with_clock(storage, config, now_epoch_ms)
    }

    /// Same as `open` with an injected time source.
    pub fn open_with_clock(
        storage: S,
        config: &StorageConfig,
        clock: fn() -> i64,
    ) -> StoreResult<Self> {
        let loaded = load_list::<Todo, S>(&storage, &config.todos_key, MODULE);
        let mut store = Self {
            storage,
            key: config.todos_key.clone(),
            subject: SnapshotSubject::new(Vec::new()),
            clock,
        };

        match loaded {
            LoadedList::Items(todos) => {
                info!(
                    "event=store_load module={} status=ok key={} items={}",
                    MODULE,
                    store.key,
                    todos.len()
                );
                store.subject.publish(todos);
            }
            LoadedList::Missing if config.seed_sample_data => store.seed()?,
            LoadedList::Missing | LoadedList::Unreadable => {}
        }

        Ok(store)
    }

    /// Synchronous read of the latest snapshot.
    pub fn snapshot(&self) -> Vec<Todo> {
        self.subject.value()
    }

    pub fn len(&self) -> usize {
        self.subject.with_value(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Todo> {
        self.subject
            .with_value(|todos| todos.iter().find(|todo| todo.id == id).cloned())
    }

    /// Subscribes to snapshots; the current one is delivered immediately.
    pub fn watch(&self, listener: impl FnMut(&Vec<Todo>) + 'static) -> SubscriptionId {
        self.subject.subscribe(listener)
    }

    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        self.subject.unsubscribe(id)
    }

    /// Appends a new pending todo.
    pub fn create(&mut self, dto: CreateTodoDto) -> StoreResult<Todo> {
        let todo = Todo::from_dto(dto, (self.clock)());
        let mut next = self.snapshot();
        next.push(todo.clone());
        self.commit(next)?;

        info!(
            "event=todo_create module={} status=ok todo_id={}",
            MODULE, todo.id
        );
        Ok(todo)
    }

    /// Merges `patch` over an existing todo.
    ///
    /// # Errors
    /// - `StoreError::TodoNotFound` when no todo has `id`.
    /// - `StoreError::Storage` when the write fails.
    pub fn update(&mut self, id: &str, patch: UpdateTodoDto) -> StoreResult<Todo> {
        let mut next = self.snapshot();
        let todo = next
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| StoreError::TodoNotFound(id.to_string()))?;
        todo.apply(patch, (self.clock)());
        let updated = todo.clone();
        self.commit(next)?;

        debug!(
            "event=todo_update module={} status=ok todo_id={} completed={}",
            MODULE, updated.id, updated.completed
        );
        Ok(updated)
    }

    /// Flips `completed` through `update`.
    pub fn toggle(&mut self, id: &str) -> StoreResult<Todo> {
        let completed = self
            .get(id)
            .map(|todo| todo.completed)
            .ok_or_else(|| StoreError::TodoNotFound(id.to_string()))?;
        self.update(id, UpdateTodoDto::completed(!completed))
    }

    /// Removes a todo. Unknown ids are not an error.
    pub fn remove(&mut self, id: &str) -> StoreResult<()> {
        let mut next = self.snapshot();
        let before = next.len();
        next.retain(|todo| todo.id != id);
        let removed = before - next.len();
        self.commit(next)?;

        debug!(
            "event=todo_remove module={} status=ok todo_id={} removed={}",
            MODULE, id, removed
        );
        Ok(())
    }

    /// Removes every completed todo.
    pub fn clear_completed(&mut self) -> StoreResult<()> {
        let mut next = self.snapshot();
        let before = next.len();
        next.retain(|todo| !todo.completed);
        let removed = before - next.len();
        self.commit(next)?;

        info!(
            "event=todo_clear_completed module={} status=ok removed={}",
            MODULE, removed
        );
        Ok(())
    }

    pub fn stats(&self) -> TodoStats {
        self.subject.with_value(|todos| compute_stats(todos))
    }

    /// Filters the current snapshot; see `todo_query::filter_todos`.
    pub fn filter(
        &self,
        search_term: &str,
        filter_type: FilterType,
        category_id: Option<&str>,
    ) -> Vec<Todo> {
        self.subject
            .with_value(|todos| filter_todos(todos, search_term, filter_type, category_id))
    }

    fn seed(&mut self) -> StoreResult<()> {
        let now = (self.clock)();
        let todos: Vec<Todo> = sample_todos()
            .into_iter()
            .map(|dto| Todo::from_dto(dto, now))
            .collect();
        let count = todos.len();
        self.commit(todos)?;

        info!(
            "event=store_seed module={} status=ok key={} items={}",
            MODULE, self.key, count
        );
        Ok(())
    }

    fn commit(&mut self, next: Vec<Todo>) -> StoreResult<()> {
        save_list(&self.storage, &self.key, &next, MODULE)?;
        self.subject.publish(next);
        Ok(())
    }
}
