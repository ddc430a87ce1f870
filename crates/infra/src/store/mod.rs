//! Persistence for lists and items.
//!
//! `ShoppingStore` is the only seam between the application service and the
//! database. Every method is a single transaction; multi-row writes (clone,
//! cascade delete, catalog read-modify-write) happen inside one store call so
//! they commit or fail as a unit.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shoplist_core::{ItemId, ListId};
use shoplist_lists::{CatalogDelta, DeltaPlan, Item, NewItem, NewList, ShoppingList};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Store operation error.
///
/// These are infrastructure errors, as opposed to domain errors (validation,
/// archived lists).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The row to update or delete does not exist.
    #[error("record not found")]
    NotFound,

    #[error("failed to open database: {0}")]
    Connect(String),

    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be decoded.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Which half of the overview to load.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListState {
    /// Ordered by `created_at` descending.
    Active,
    /// Ordered by `archived_at` descending.
    Archived,
}

#[async_trait]
pub trait ShoppingStore: Send + Sync {
    async fn insert_list(&self, new: NewList) -> Result<ShoppingList, StoreError>;

    async fn get_list(&self, id: ListId) -> Result<Option<ShoppingList>, StoreError>;

    /// Persist name, `archived_at` and `active` of an existing list.
    async fn update_list(&self, list: &ShoppingList) -> Result<(), StoreError>;

    async fn lists_by_state(&self, state: ListState) -> Result<Vec<ShoppingList>, StoreError>;

    /// Delete a list and all of its items.
    async fn delete_list(&self, id: ListId) -> Result<(), StoreError>;

    /// Insert `new` and copy every item of `source` into it (done reset).
    async fn clone_list(&self, new: NewList, source: ListId) -> Result<ShoppingList, StoreError>;

    async fn insert_item(&self, new: NewItem) -> Result<Item, StoreError>;

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError>;

    /// Items of one list, ordered by id.
    async fn items_for_list(&self, id: ListId) -> Result<Vec<Item>, StoreError>;

    /// Every description used on any list, distinct and sorted ascending.
    async fn distinct_descriptions(&self) -> Result<Vec<String>, StoreError>;

    /// Read the list's item for the delta's description, plan the change and
    /// write it, atomically. Returns the plan that was applied.
    async fn apply_catalog_delta(&self, delta: &CatalogDelta) -> Result<DeltaPlan, StoreError>;
}

#[async_trait]
impl<S> ShoppingStore for Arc<S>
where
    S: ShoppingStore + ?Sized,
{
    async fn insert_list(&self, new: NewList) -> Result<ShoppingList, StoreError> {
        (**self).insert_list(new).await
    }

    async fn get_list(&self, id: ListId) -> Result<Option<ShoppingList>, StoreError> {
        (**self).get_list(id).await
    }

    async fn update_list(&self, list: &ShoppingList) -> Result<(), StoreError> {
        (**self).update_list(list).await
    }

    async fn lists_by_state(&self, state: ListState) -> Result<Vec<ShoppingList>, StoreError> {
        (**self).lists_by_state(state).await
    }

    async fn delete_list(&self, id: ListId) -> Result<(), StoreError> {
        (**self).delete_list(id).await
    }

    async fn clone_list(&self, new: NewList, source: ListId) -> Result<ShoppingList, StoreError> {
        (**self).clone_list(new, source).await
    }

    async fn insert_item(&self, new: NewItem) -> Result<Item, StoreError> {
        (**self).insert_item(new).await
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        (**self).get_item(id).await
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        (**self).delete_item(id).await
    }

    async fn items_for_list(&self, id: ListId) -> Result<Vec<Item>, StoreError> {
        (**self).items_for_list(id).await
    }

    async fn distinct_descriptions(&self) -> Result<Vec<String>, StoreError> {
        (**self).distinct_descriptions().await
    }

    async fn apply_catalog_delta(&self, delta: &CatalogDelta) -> Result<DeltaPlan, StoreError> {
        (**self).apply_catalog_delta(delta).await
    }
}
