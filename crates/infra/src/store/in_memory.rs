use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use shoplist_core::{Entity, ItemId, ListId};
use shoplist_lists::{CatalogDelta, DeltaPlan, Item, NewItem, NewList, ShoppingList};

use super::{ListState, ShoppingStore, StoreError};

/// In-memory store for tests/dev.
///
/// Ids are assigned from counters starting at 1, like SQLite rowids.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    last_list_id: i64,
    last_item_id: i64,
    lists: BTreeMap<ListId, ShoppingList>,
    items: BTreeMap<ItemId, Item>,
}

impl Tables {
    fn insert_list(&mut self, new: NewList) -> ShoppingList {
        self.last_list_id += 1;
        let list = ShoppingList::from_new(ListId::new(self.last_list_id), new);
        self.lists.insert(list.id(), list.clone());
        list
    }

    fn insert_item(&mut self, new: NewItem) -> Result<Item, StoreError> {
        if !self.lists.contains_key(&new.list_id()) {
            return Err(StoreError::Database(format!(
                "foreign key violation: list {} does not exist",
                new.list_id()
            )));
        }
        self.last_item_id += 1;
        let item = Item::from_new(ItemId::new(self.last_item_id), new);
        self.items.insert(item.id(), item.clone());
        Ok(item)
    }

    fn items_for_list(&self, list_id: ListId) -> Vec<Item> {
        // BTreeMap iteration is in id order.
        self.items
            .values()
            .filter(|item| item.list_id() == list_id)
            .cloned()
            .collect()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Database("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Database("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ShoppingStore for InMemoryStore {
    async fn insert_list(&self, new: NewList) -> Result<ShoppingList, StoreError> {
        Ok(self.write()?.insert_list(new))
    }

    async fn get_list(&self, id: ListId) -> Result<Option<ShoppingList>, StoreError> {
        Ok(self.read()?.lists.get(&id).cloned())
    }

    async fn update_list(&self, list: &ShoppingList) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        match tables.lists.get_mut(&list.id()) {
            Some(stored) => {
                *stored = list.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn lists_by_state(&self, state: ListState) -> Result<Vec<ShoppingList>, StoreError> {
        let tables = self.read()?;
        let mut lists: Vec<ShoppingList> = tables
            .lists
            .values()
            .filter(|list| list.is_active() == (state == ListState::Active))
            .cloned()
            .collect();
        match state {
            ListState::Active => {
                lists.sort_by(|a, b| (b.created_at(), b.id()).cmp(&(a.created_at(), a.id())))
            }
            ListState::Archived => {
                lists.sort_by(|a, b| (b.archived_at(), b.id()).cmp(&(a.archived_at(), a.id())))
            }
        }
        Ok(lists)
    }

    async fn delete_list(&self, id: ListId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.lists.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        tables.items.retain(|_, item| item.list_id() != id);
        Ok(())
    }

    async fn clone_list(&self, new: NewList, source: ListId) -> Result<ShoppingList, StoreError> {
        let mut tables = self.write()?;
        if !tables.lists.contains_key(&source) {
            return Err(StoreError::NotFound);
        }
        let copies = tables.items_for_list(source);
        let list = tables.insert_list(new);
        for item in &copies {
            tables.insert_item(NewItem::copy_of(item, list.id()))?;
        }
        Ok(list)
    }

    async fn insert_item(&self, new: NewItem) -> Result<Item, StoreError> {
        self.write()?.insert_item(new)
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        match self.write()?.items.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn items_for_list(&self, id: ListId) -> Result<Vec<Item>, StoreError> {
        Ok(self.read()?.items_for_list(id))
    }

    async fn distinct_descriptions(&self) -> Result<Vec<String>, StoreError> {
        let tables = self.read()?;
        let descriptions: BTreeSet<String> = tables
            .items
            .values()
            .map(|item| item.description().to_string())
            .collect();
        Ok(descriptions.into_iter().collect())
    }

    async fn apply_catalog_delta(&self, delta: &CatalogDelta) -> Result<DeltaPlan, StoreError> {
        let mut tables = self.write()?;
        let existing = tables
            .items
            .values()
            .find(|item| item.list_id() == delta.list_id() && item.description() == delta.description())
            .cloned();

        let plan = delta.plan(existing.as_ref());
        match &plan {
            DeltaPlan::Unchanged => {}
            DeltaPlan::Create(new) => {
                tables.insert_item(new.clone())?;
            }
            DeltaPlan::Update(item) => {
                tables.items.insert(item.id(), item.clone());
            }
            DeltaPlan::Delete(id) => {
                tables.items.remove(id);
            }
        }
        Ok(plan)
    }
}
