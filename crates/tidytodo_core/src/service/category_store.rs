//! Category store.
//!
//! Same persistence contract as `TodoStore`, keyed separately. Deleting a
//! category never touches todos that reference it.

use crate::config::StorageConfig;
use crate::model::category::{sample_categories, Category, CreateCategoryDto, UpdateCategoryDto};
use crate::model::now_epoch_ms;
use crate::reactive::{SnapshotSubject, SubscriptionId};
use crate::service::error::{StoreError, StoreResult};
use crate::service::persisted_list::{load_list, save_list, LoadedList};
use crate::storage::kv_store::KeyValueStore;
use log::info;

const MODULE: &str = "category_store";

pub struct CategoryStore<S: KeyValueStore> {
    storage: S,
    key: String,
    subject: SnapshotSubject<Vec<Category>>,
    clock: fn() -> i64,
}

impl<S: KeyValueStore> CategoryStore<S> {
    /// Loads categories and seeds the four samples when the list is empty.
    pub fn open(storage: S, config: &StorageConfig) -> StoreResult<Self> {
        Self::open_with_clock(storage, config, now_epoch_ms)
    }

    pub fn open_with_clock(
        storage: S,
        config: &StorageConfig,
        clock: fn() -> i64,
    ) -> StoreResult<Self> {
        let loaded = load_list::<Category, S>(&storage, &config.categories_key, MODULE);
        let mut store = Self {
            storage,
            key: config.categories_key.clone(),
            subject: SnapshotSubject::new(Vec::new()),
            clock,
        };

        let starting_empty = match loaded {
            LoadedList::Items(categories) if !categories.is_empty() => {
                store.subject.publish(categories);
                false
            }
            LoadedList::Items(_) | LoadedList::Missing => true,
            LoadedList::Unreadable => false,
        };
        if starting_empty && config.seed_sample_data {
            store.seed()?;
        }

        info!(
            "event=store_load module={} status=ok key={} items={}",
            MODULE,
            store.key,
            store.len()
        );
        Ok(store)
    }

    pub fn snapshot(&self) -> Vec<Category> {
        self.subject.value()
    }

    pub fn len(&self) -> usize {
        self.subject.with_value(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_by_id(&self, id: &str) -> Option<Category> {
        self.subject.with_value(|categories| {
            categories
                .iter()
                .find(|category| category.id == id)
                .cloned()
        })
    }

    pub fn watch(&self, listener: impl FnMut(&Vec<Category>) + 'static) -> SubscriptionId {
        self.subject.subscribe(listener)
    }

    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        self.subject.unsubscribe(id)
    }

    pub fn create(&mut self, dto: CreateCategoryDto) -> StoreResult<Category> {
        let category = Category::from_dto(dto, (self.clock)());
        let mut next = self.snapshot();
        next.push(category.clone());
        self.commit(next)?;

        info!(
            "event=category_create module={} status=ok category_id={}",
            MODULE, category.id
        );
        Ok(category)
    }

    /// # Errors
    /// - `StoreError::CategoryNotFound` when no category has `id`.
    pub fn update(&mut self, id: &str, patch: UpdateCategoryDto) -> StoreResult<Category> {
        let mut next = self.snapshot();
        let category = next
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;
        category.apply(patch, (self.clock)());
        let updated = category.clone();
        self.commit(next)?;

        info!(
            "event=category_update module={} status=ok category_id={}",
            MODULE, updated.id
        );
        Ok(updated)
    }

    /// Removes a category. Unknown ids are not an error.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let mut next = self.snapshot();
        next.retain(|category| category.id != id);
        self.commit(next)?;

        info!(
            "event=category_delete module={} status=ok category_id={}",
            MODULE, id
        );
        Ok(())
    }

    fn seed(&mut self) -> StoreResult<()> {
        let now = (self.clock)();
        let categories: Vec<Category> = sample_categories()
            .into_iter()
            .map(|dto| Category::from_dto(dto, now))
            .collect();
        self.commit(categories)?;

        info!(
            "event=store_seed module={} status=ok key={}",
            MODULE, self.key
        );
        Ok(())
    }

    fn commit(&mut self, next: Vec<Category>) -> StoreResult<()> {
        save_list(&self.storage, &self.key, &next, MODULE)?;
        self.subject.publish(next);
        Ok(())
    }
}
