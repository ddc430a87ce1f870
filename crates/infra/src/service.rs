//! Application service: the operations behind every HTTP route.
//!
//! Each operation loads what it needs from the store, lets the domain types
//! in `shoplist-lists` decide, and writes the result back. Timestamps are
//! passed in by the caller so behavior stays deterministic under test.
//!
//! ```text
//! request → ListService → domain decision → ShoppingStore (one transaction)
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

use shoplist_core::{DomainError, Entity, ItemId, ListId};
use shoplist_lists::{
    ActivateOutcome, ArchiveOutcome, CatalogDelta, CatalogEntry, DeltaPlan, Item, NewItem, NewList,
    ShoppingList, build_catalog,
};

use crate::store::{ListState, ShoppingStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// User input was rejected; the message is user-facing.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Mutation of an archived list.
    #[error("cannot modify archived list")]
    ArchivedList,
    /// Unknown list or item.
    #[error("not found")]
    NotFound,
    /// Persistence failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => ServiceError::NotFound,
            other => ServiceError::Store(other),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::ArchivedList => ServiceError::ArchivedList,
            DomainError::InvalidId(_) => ServiceError::NotFound,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Index page data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOverview {
    /// Newest first.
    pub active: Vec<ShoppingList>,
    /// Most recently archived first.
    pub archived: Vec<ShoppingList>,
}

/// A list with its items, ordered by item id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDetail {
    pub list: ShoppingList,
    pub items: Vec<Item>,
}

/// A list with the catalog as seen from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub list: ShoppingList,
    pub entries: Vec<CatalogEntry>,
}

/// List and item operations over a [`ShoppingStore`].
#[derive(Debug, Clone)]
pub struct ListService<S> {
    store: S,
}

impl<S> ListService<S>
where
    S: ShoppingStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn overview(&self) -> ServiceResult<ListOverview> {
        Ok(ListOverview {
            active: self.store.lists_by_state(ListState::Active).await?,
            archived: self.store.lists_by_state(ListState::Archived).await?,
        })
    }

    pub async fn get_list(&self, id: ListId) -> ServiceResult<ShoppingList> {
        self.store.get_list(id).await?.ok_or(ServiceError::NotFound)
    }

    pub async fn list_detail(&self, id: ListId) -> ServiceResult<ListDetail> {
        let list = self.get_list(id).await?;
        let items = self.store.items_for_list(id).await?;
        Ok(ListDetail { list, items })
    }

    pub async fn create_list(&self, name: &str, now: DateTime<Utc>) -> ServiceResult<ShoppingList> {
        let new = NewList::new(name, now)?;
        let list = self.store.insert_list(new).await?;
        tracing::info!(list_id = %list.id(), name = list.name(), "list created");
        Ok(list)
    }

    pub async fn rename_list(&self, id: ListId, new_name: &str) -> ServiceResult<ShoppingList> {
        let mut list = self.get_list(id).await?;
        list.rename(new_name)?;
        self.store.update_list(&list).await?;
        tracing::info!(list_id = %id, name = list.name(), "list renamed");
        Ok(list)
    }

    pub async fn archive_list(&self, id: ListId, now: DateTime<Utc>) -> ServiceResult<ArchiveOutcome> {
        let mut list = self.get_list(id).await?;
        let outcome = list.archive(now);
        if outcome == ArchiveOutcome::Archived {
            self.store.update_list(&list).await?;
            tracing::info!(list_id = %id, "list archived");
        }
        Ok(outcome)
    }

    /// Reactivate an archived list; the list is renamed with the
    /// reactivation date as part of the same update.
    pub async fn activate_list(&self, id: ListId, now: DateTime<Utc>) -> ServiceResult<ActivateOutcome> {
        let mut list = self.get_list(id).await?;
        let outcome = list.activate(now)?;
        if outcome == ActivateOutcome::Reactivated {
            self.store.update_list(&list).await?;
            tracing::info!(list_id = %id, name = list.name(), "list reactivated");
        }
        Ok(outcome)
    }

    /// Copy a list (active or archived) with all its items.
    pub async fn clone_list(&self, id: ListId, now: DateTime<Utc>) -> ServiceResult<ShoppingList> {
        let source = self.get_list(id).await?;
        let copy = self
            .store
            .clone_list(NewList::clone_of(&source, now), source.id())
            .await?;
        tracing::info!(source_id = %id, list_id = %copy.id(), "list cloned");
        Ok(copy)
    }

    /// Delete a list together with all of its items.
    pub async fn delete_list(&self, id: ListId) -> ServiceResult<()> {
        self.store.delete_list(id).await?;
        tracing::info!(list_id = %id, "list deleted");
        Ok(())
    }

    pub async fn add_item(&self, id: ListId, description: &str, quantity_raw: &str) -> ServiceResult<Item> {
        let list = self.get_list(id).await?;
        let new = NewItem::add(&list, description, quantity_raw)?;
        Ok(self.store.insert_item(new).await?)
    }

    /// Delete an item regardless of its list's state. Returns the owning
    /// list so callers can redirect back to it.
    pub async fn delete_item(&self, id: ItemId) -> ServiceResult<ListId> {
        let item = self.store.get_item(id).await?.ok_or(ServiceError::NotFound)?;
        self.store.delete_item(id).await?;
        tracing::info!(item_id = %id, list_id = %item.list_id(), "item deleted");
        Ok(item.list_id())
    }

    pub async fn catalog(&self, id: ListId) -> ServiceResult<CatalogView> {
        let list = self.get_list(id).await?;
        let descriptions = self.store.distinct_descriptions().await?;
        let items = self.store.items_for_list(id).await?;
        Ok(CatalogView {
            entries: build_catalog(descriptions, &items),
            list,
        })
    }

    pub async fn apply_catalog_delta(
        &self,
        id: ListId,
        description: &str,
        delta_raw: &str,
    ) -> ServiceResult<DeltaPlan> {
        let list = self.get_list(id).await?;
        let delta = CatalogDelta::parse(&list, description, delta_raw)?;
        if delta.is_noop() {
            return Ok(DeltaPlan::Unchanged);
        }
        let plan = self.store.apply_catalog_delta(&delta).await?;
        tracing::debug!(list_id = %id, description = delta.description(), delta = delta.delta(), ?plan, "catalog delta applied");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::store::InMemoryStore;

    fn service() -> ListService<InMemoryStore> {
        ListService::new(InMemoryStore::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    async fn quantities(svc: &ListService<InMemoryStore>, id: ListId) -> Vec<(String, i64)> {
        svc.list_detail(id)
            .await
            .unwrap()
            .items
            .iter()
            .map(|i| (i.description().to_string(), i.quantity()))
            .collect()
    }

    #[tokio::test]
    async fn groceries_walkthrough() {
        let svc = service();
        let list = svc.create_list("Groceries", test_time()).await.unwrap();
        assert_eq!(list.id(), ListId::new(1));
        assert!(list.is_active());

        let eggs = svc.add_item(list.id(), "Eggs", "12").await.unwrap();
        assert_eq!(eggs.quantity(), 12);

        let plan = svc.apply_catalog_delta(list.id(), "Eggs", "-12").await.unwrap();
        assert_eq!(plan, DeltaPlan::Delete(eggs.id()));
        assert!(quantities(&svc, list.id()).await.is_empty());
    }

    #[tokio::test]
    async fn created_list_is_active_on_lookup() {
        let svc = service();
        let list = svc.create_list("  Weekend ", test_time()).await.unwrap();
        let loaded = svc.get_list(list.id()).await.unwrap();
        assert_eq!(loaded.name(), "Weekend");
        assert!(loaded.is_active());
        assert_eq!(loaded.archived_at(), None);
    }

    #[tokio::test]
    async fn blank_list_name_is_a_validation_error() {
        let svc = service();
        assert!(matches!(
            svc.create_list("   ", test_time()).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(svc.overview().await.unwrap().active.is_empty());
    }

    #[tokio::test]
    async fn archive_then_activate_renames() {
        let svc = service();
        let list = svc.create_list("Groceries", test_time()).await.unwrap();

        assert_eq!(svc.archive_list(list.id(), test_time()).await.unwrap(), ArchiveOutcome::Archived);
        assert_eq!(
            svc.archive_list(list.id(), test_time()).await.unwrap(),
            ArchiveOutcome::AlreadyArchived
        );

        let reactivated_at = test_time() + Duration::days(3);
        assert_eq!(
            svc.activate_list(list.id(), reactivated_at).await.unwrap(),
            ActivateOutcome::Reactivated
        );
        let loaded = svc.get_list(list.id()).await.unwrap();
        assert!(loaded.is_active());
        assert_eq!(loaded.archived_at(), None);
        assert_eq!(loaded.name(), "Groceries (reaktiviert am 04.06.2024)");

        assert_eq!(
            svc.activate_list(list.id(), reactivated_at).await.unwrap(),
            ActivateOutcome::AlreadyActive
        );
    }

    #[tokio::test]
    async fn overview_splits_active_and_archived() {
        let svc = service();
        let a = svc.create_list("A", test_time()).await.unwrap();
        let b = svc.create_list("B", test_time() + Duration::minutes(1)).await.unwrap();
        let c = svc.create_list("C", test_time() + Duration::minutes(2)).await.unwrap();
        svc.archive_list(a.id(), test_time() + Duration::hours(1)).await.unwrap();
        svc.archive_list(c.id(), test_time() + Duration::hours(2)).await.unwrap();

        let overview = svc.overview().await.unwrap();
        let active: Vec<ListId> = overview.active.iter().map(|l| l.id()).collect();
        let archived: Vec<ListId> = overview.archived.iter().map(|l| l.id()).collect();
        assert_eq!(active, vec![b.id()]);
        assert_eq!(archived, vec![c.id(), a.id()]);
    }

    #[tokio::test]
    async fn rename_validates_and_persists() {
        let svc = service();
        let list = svc.create_list("Groceries", test_time()).await.unwrap();

        assert!(matches!(svc.rename_list(list.id(), " ").await, Err(ServiceError::Validation(_))));
        svc.rename_list(list.id(), " Market ").await.unwrap();
        assert_eq!(svc.get_list(list.id()).await.unwrap().name(), "Market");

        assert!(matches!(
            svc.rename_list(ListId::new(404), "x").await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn clone_is_independent_of_source() {
        let svc = service();
        let source = svc.create_list("Party", test_time()).await.unwrap();
        svc.add_item(source.id(), "Chips", "3").await.unwrap();
        svc.add_item(source.id(), "Cola", "6").await.unwrap();
        svc.archive_list(source.id(), test_time()).await.unwrap();

        let copy = svc.clone_list(source.id(), test_time()).await.unwrap();
        assert_ne!(copy.id(), source.id());
        assert!(copy.is_active());
        assert_eq!(copy.name(), "Party (Kopie)");

        let copied = svc.list_detail(copy.id()).await.unwrap().items;
        assert!(copied.iter().all(|i| !i.is_done()));

        // Mutating the copy leaves the archived source alone.
        svc.apply_catalog_delta(copy.id(), "Chips", "2").await.unwrap();
        svc.delete_item(copied[1].id()).await.unwrap();

        assert_eq!(
            quantities(&svc, source.id()).await,
            vec![("Chips".to_string(), 3), ("Cola".to_string(), 6)]
        );
        assert_eq!(quantities(&svc, copy.id()).await, vec![("Chips".to_string(), 5)]);
    }

    #[tokio::test]
    async fn invalid_quantities_leave_items_unchanged() {
        let svc = service();
        let list = svc.create_list("Groceries", test_time()).await.unwrap();
        svc.add_item(list.id(), "Bread", "").await.unwrap();

        for raw in ["0", "-3", "abc"] {
            assert!(matches!(
                svc.add_item(list.id(), "Milk", raw).await,
                Err(ServiceError::Validation(_))
            ));
        }
        assert_eq!(quantities(&svc, list.id()).await, vec![("Bread".to_string(), 1)]);
    }

    #[tokio::test]
    async fn archived_list_rejects_item_changes_but_not_deletes() {
        let svc = service();
        let list = svc.create_list("Groceries", test_time()).await.unwrap();
        let milk = svc.add_item(list.id(), "Milk", "2").await.unwrap();
        svc.archive_list(list.id(), test_time()).await.unwrap();

        assert!(matches!(
            svc.add_item(list.id(), "Bread", "1").await,
            Err(ServiceError::ArchivedList)
        ));
        assert!(matches!(
            svc.apply_catalog_delta(list.id(), "Milk", "1").await,
            Err(ServiceError::ArchivedList)
        ));

        assert_eq!(svc.delete_item(milk.id()).await.unwrap(), list.id());
        assert!(quantities(&svc, list.id()).await.is_empty());
    }

    #[tokio::test]
    async fn delete_item_removes_exactly_one() {
        let svc = service();
        let list = svc.create_list("Groceries", test_time()).await.unwrap();
        let a = svc.add_item(list.id(), "Apples", "4").await.unwrap();
        svc.add_item(list.id(), "Bananas", "6").await.unwrap();

        assert_eq!(svc.delete_item(a.id()).await.unwrap(), list.id());
        assert_eq!(quantities(&svc, list.id()).await, vec![("Bananas".to_string(), 6)]);
        assert!(matches!(svc.delete_item(a.id()).await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn milk_delta_creates_then_deletes() {
        let svc = service();
        let list = svc.create_list("Groceries", test_time()).await.unwrap();

        svc.apply_catalog_delta(list.id(), "milk", "+2").await.unwrap();
        assert_eq!(quantities(&svc, list.id()).await, vec![("milk".to_string(), 2)]);

        svc.apply_catalog_delta(list.id(), "milk", "-5").await.unwrap();
        assert!(quantities(&svc, list.id()).await.is_empty());

        // Nothing to decrement.
        assert_eq!(
            svc.apply_catalog_delta(list.id(), "milk", "-1").await.unwrap(),
            DeltaPlan::Unchanged
        );
        assert!(quantities(&svc, list.id()).await.is_empty());
    }

    #[tokio::test]
    async fn catalog_covers_every_list() {
        let svc = service();
        let home = svc.create_list("Home", test_time()).await.unwrap();
        let office = svc.create_list("Office", test_time()).await.unwrap();
        svc.add_item(home.id(), "Milk", "2").await.unwrap();
        svc.add_item(office.id(), "Coffee", "1").await.unwrap();
        svc.add_item(office.id(), "Milk", "5").await.unwrap();

        let view = svc.catalog(home.id()).await.unwrap();
        assert_eq!(view.list.id(), home.id());
        assert_eq!(
            view.entries,
            vec![
                CatalogEntry { description: "Coffee".into(), quantity: 0 },
                CatalogEntry { description: "Milk".into(), quantity: 2 },
            ]
        );

        assert!(matches!(svc.catalog(ListId::new(77)).await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn delete_list_cascades() {
        let svc = service();
        let doomed = svc.create_list("Doomed", test_time()).await.unwrap();
        let kept = svc.create_list("Kept", test_time()).await.unwrap();
        svc.add_item(doomed.id(), "Milk", "1").await.unwrap();
        svc.add_item(kept.id(), "Bread", "1").await.unwrap();

        svc.delete_list(doomed.id()).await.unwrap();

        assert!(matches!(svc.get_list(doomed.id()).await, Err(ServiceError::NotFound)));
        let catalog = svc.catalog(kept.id()).await.unwrap();
        assert_eq!(catalog.entries, vec![CatalogEntry { description: "Bread".into(), quantity: 1 }]);
        assert!(matches!(svc.delete_list(doomed.id()).await, Err(ServiceError::NotFound)));
    }
}
