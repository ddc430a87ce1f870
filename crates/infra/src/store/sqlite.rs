//! SQLite-backed store.
//!
//! Two tables, `shopping_lists` and `items`. The schema is created by an
//! explicit [`SqliteStore::migrate`] call at startup; queries never recreate
//! tables on failure.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database (any code) | `Database` |
//! | RowNotFound | `NotFound` |
//! | PoolClosed / Io / Tls | `Database` |
//! | ColumnDecode / Decode | `Corrupt` |

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use tracing::instrument;

use shoplist_core::{Entity, ItemId, ListId};
use shoplist_lists::{CatalogDelta, DeltaPlan, Item, NewItem, NewList, ShoppingList};

use super::{ListState, ShoppingStore, StoreError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS shopping_lists (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT    NOT NULL,
        created_at  TEXT    NOT NULL,
        archived_at TEXT    NULL,
        active      INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        list_id     INTEGER NOT NULL REFERENCES shopping_lists(id),
        description TEXT    NOT NULL,
        quantity    INTEGER NOT NULL DEFAULT 1,
        done        INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS items_list_description
        ON items (list_id, description)
    "#,
];

/// How long a connection waits for the write lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite store over a connection pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (and create if missing) the database file at `path`.
    ///
    /// The parent directory is created when it does not exist yet.
    pub async fn connect(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Connect(format!("failed to create {}: {e}", parent.display()))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connect(format!("{}: {e}", path.display())))?;

        Ok(Self::new(pool))
    }

    /// Private in-memory database for tests.
    ///
    /// Limited to one connection that never expires, since every SQLite
    /// connection to `:memory:` opens a separate database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Connect(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;

        Ok(Self::new(pool))
    }

    /// Create tables and indexes that don't exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let mut tx = self.begin_write().await?;
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        tracing::info!("database schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a write transaction with `BEGIN IMMEDIATE`, so concurrent
    /// read-modify-write calls queue on the write lock instead of failing
    /// with `SQLITE_BUSY`.
    async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, StoreError> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| map_sqlx_error("begin", e))
    }
}

#[async_trait]
impl ShoppingStore for SqliteStore {
    #[instrument(skip(self, new), fields(name = new.name()), err)]
    async fn insert_list(&self, new: NewList) -> Result<ShoppingList, StoreError> {
        let mut tx = self.begin_write().await?;
        let list = insert_list_tx(&mut tx, new).await?;
        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(list)
    }

    #[instrument(skip(self), err)]
    async fn get_list(&self, id: ListId) -> Result<Option<ShoppingList>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, archived_at
            FROM shopping_lists
            WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_list", e))?;

        row.as_ref().map(list_from_row).transpose()
    }

    #[instrument(skip(self, list), fields(list_id = %list.id()), err)]
    async fn update_list(&self, list: &ShoppingList) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE shopping_lists
            SET name = ?1, archived_at = ?2, active = ?3
            WHERE id = ?4
            "#,
        )
        .bind(list.name())
        .bind(list.archived_at())
        .bind(list.is_active())
        .bind(list.id().get())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_list", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn lists_by_state(&self, state: ListState) -> Result<Vec<ShoppingList>, StoreError> {
        let sql = match state {
            ListState::Active => {
                r#"
                SELECT id, name, created_at, archived_at
                FROM shopping_lists
                WHERE active = 1
                ORDER BY created_at DESC, id DESC
                "#
            }
            ListState::Archived => {
                r#"
                SELECT id, name, created_at, archived_at
                FROM shopping_lists
                WHERE active = 0
                ORDER BY archived_at DESC, id DESC
                "#
            }
        };

        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("lists_by_state", e))?;

        rows.iter().map(list_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn delete_list(&self, id: ListId) -> Result<(), StoreError> {
        let mut tx = self.begin_write().await?;

        sqlx::query("DELETE FROM items WHERE list_id = ?1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_list_items", e))?;

        let result = sqlx::query("DELETE FROM shopping_lists WHERE id = ?1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_list", e))?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::NotFound);
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(())
    }

    #[instrument(skip(self, new), fields(name = new.name()), err)]
    async fn clone_list(&self, new: NewList, source: ListId) -> Result<ShoppingList, StoreError> {
        let mut tx = self.begin_write().await?;

        let exists = sqlx::query("SELECT 1 FROM shopping_lists WHERE id = ?1")
            .bind(source.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("clone_list_source", e))?;
        if exists.is_none() {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::NotFound);
        }

        let list = insert_list_tx(&mut tx, new).await?;

        sqlx::query(
            r#"
            INSERT INTO items (list_id, description, quantity, done)
            SELECT ?1, description, quantity, 0
            FROM items
            WHERE list_id = ?2
            ORDER BY id ASC
            "#,
        )
        .bind(list.id().get())
        .bind(source.get())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("clone_list_items", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(list)
    }

    #[instrument(skip(self, new), fields(list_id = %new.list_id()), err)]
    async fn insert_item(&self, new: NewItem) -> Result<Item, StoreError> {
        let mut tx = self.begin_write().await?;
        let item = insert_item_tx(&mut tx, new).await?;
        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(item)
    }

    #[instrument(skip(self), err)]
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, list_id, description, quantity, done
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_item", e))?;

        row.as_ref().map(item_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_item", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn items_for_list(&self, id: ListId) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, list_id, description, quantity, done
            FROM items
            WHERE list_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("items_for_list", e))?;

        rows.iter().map(item_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn distinct_descriptions(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT DISTINCT description FROM items ORDER BY description ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("distinct_descriptions", e))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("description")
                    .map_err(|e| map_sqlx_error("distinct_descriptions", e))
            })
            .collect()
    }

    #[instrument(
        skip(self, delta),
        fields(
            list_id = %delta.list_id(),
            description = delta.description(),
            delta = delta.delta()
        ),
        err
    )]
    async fn apply_catalog_delta(&self, delta: &CatalogDelta) -> Result<DeltaPlan, StoreError> {
        let mut tx = self.begin_write().await?;

        let row = sqlx::query(
            r#"
            SELECT id, list_id, description, quantity, done
            FROM items
            WHERE list_id = ?1 AND description = ?2
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(delta.list_id().get())
        .bind(delta.description())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("catalog_lookup", e))?;
        let existing = row.as_ref().map(item_from_row).transpose()?;

        let plan = delta.plan(existing.as_ref());
        match &plan {
            DeltaPlan::Unchanged => {}
            DeltaPlan::Create(new) => {
                insert_item_tx(&mut tx, new.clone()).await?;
            }
            DeltaPlan::Update(item) => {
                sqlx::query("UPDATE items SET quantity = ?1 WHERE id = ?2")
                    .bind(item.quantity())
                    .bind(item.id().get())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("catalog_update", e))?;
            }
            DeltaPlan::Delete(id) => {
                sqlx::query("DELETE FROM items WHERE id = ?1")
                    .bind(id.get())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("catalog_delete", e))?;
            }
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(plan)
    }
}

async fn insert_list_tx(
    tx: &mut Transaction<'_, Sqlite>,
    new: NewList,
) -> Result<ShoppingList, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO shopping_lists (name, created_at, archived_at, active)
        VALUES (?1, ?2, NULL, 1)
        "#,
    )
    .bind(new.name())
    .bind(new.created_at())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_list", e))?;

    Ok(ShoppingList::from_new(ListId::new(result.last_insert_rowid()), new))
}

async fn insert_item_tx(tx: &mut Transaction<'_, Sqlite>, new: NewItem) -> Result<Item, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO items (list_id, description, quantity, done)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(new.list_id().get())
    .bind(new.description())
    .bind(new.quantity())
    .bind(new.is_done())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_item", e))?;

    Ok(Item::from_new(ItemId::new(result.last_insert_rowid()), new))
}

fn list_from_row(row: &SqliteRow) -> Result<ShoppingList, StoreError> {
    let id: i64 = row.try_get("id").map_err(|e| map_sqlx_error("decode_list", e))?;
    let name: String = row.try_get("name").map_err(|e| map_sqlx_error("decode_list", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| map_sqlx_error("decode_list", e))?;
    let archived_at: Option<DateTime<Utc>> = row
        .try_get("archived_at")
        .map_err(|e| map_sqlx_error("decode_list", e))?;

    Ok(ShoppingList::restore(ListId::new(id), name, created_at, archived_at))
}

fn item_from_row(row: &SqliteRow) -> Result<Item, StoreError> {
    let id: i64 = row.try_get("id").map_err(|e| map_sqlx_error("decode_item", e))?;
    let list_id: i64 = row.try_get("list_id").map_err(|e| map_sqlx_error("decode_item", e))?;
    let description: String = row
        .try_get("description")
        .map_err(|e| map_sqlx_error("decode_item", e))?;
    let quantity: i64 = row.try_get("quantity").map_err(|e| map_sqlx_error("decode_item", e))?;
    let done: bool = row.try_get("done").map_err(|e| map_sqlx_error("decode_item", e))?;

    if quantity <= 0 {
        return Err(StoreError::Corrupt(format!(
            "item {id} has non-positive quantity {quantity}"
        )));
    }

    Ok(Item::restore(ItemId::new(id), ListId::new(list_id), description, quantity, done))
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Database(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Corrupt(format!("{} in {}", err, operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    async fn store() -> SqliteStore {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    fn new_list(name: &str) -> NewList {
        NewList::new(name, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn migrate_is_repeatable() {
        let store = store().await;
        store.migrate().await.unwrap();
        assert!(store.lists_by_state(ListState::Active).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_round_trips_through_sqlite() {
        let store = store().await;
        let created = store.insert_list(new_list("Groceries")).await.unwrap();
        assert_eq!(created.id(), ListId::new(1));

        let loaded = store.get_list(created.id()).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert!(loaded.is_active());
        assert_eq!(loaded.archived_at(), None);

        assert!(store.get_list(ListId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_persists_archive_state() {
        let store = store().await;
        let mut list = store.insert_list(new_list("Groceries")).await.unwrap();
        let when = Utc::now() + Duration::minutes(1);
        list.archive(when);
        store.update_list(&list).await.unwrap();

        let loaded = store.get_list(list.id()).await.unwrap().unwrap();
        assert!(!loaded.is_active());
        assert_eq!(loaded.archived_at(), Some(when));

        let archived = store.lists_by_state(ListState::Archived).await.unwrap();
        assert_eq!(archived.len(), 1);
        assert!(store.lists_by_state(ListState::Active).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_list_is_not_found() {
        let store = store().await;
        let ghost = ShoppingList::restore(ListId::new(5), "ghost".into(), Utc::now(), None);
        assert!(matches!(store.update_list(&ghost).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn active_lists_newest_first() {
        let store = store().await;
        let now = Utc::now();
        store.insert_list(NewList::new("old", now).unwrap()).await.unwrap();
        store
            .insert_list(NewList::new("new", now + Duration::seconds(5)).unwrap())
            .await
            .unwrap();

        let active = store.lists_by_state(ListState::Active).await.unwrap();
        let names: Vec<&str> = active.iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn clone_copies_items_with_done_reset() {
        let store = store().await;
        let source = store.insert_list(new_list("Party")).await.unwrap();
        store
            .insert_item(NewItem::add(&source, "Chips", "3").unwrap())
            .await
            .unwrap();
        store
            .insert_item(NewItem::add(&source, "Cola", "").unwrap())
            .await
            .unwrap();
        sqlx::query("UPDATE items SET done = 1")
            .execute(store.pool())
            .await
            .unwrap();

        let copy = store
            .clone_list(NewList::clone_of(&source, Utc::now()), source.id())
            .await
            .unwrap();
        assert_ne!(copy.id(), source.id());
        assert_eq!(copy.name(), "Party (Kopie)");

        let items = store.items_for_list(copy.id()).await.unwrap();
        let summary: Vec<(&str, i64, bool)> = items
            .iter()
            .map(|i| (i.description(), i.quantity(), i.is_done()))
            .collect();
        assert_eq!(summary, vec![("Chips", 3, false), ("Cola", 1, false)]);
    }

    #[tokio::test]
    async fn clone_of_missing_list_writes_nothing() {
        let store = store().await;
        let phantom = ShoppingList::restore(ListId::new(42), "phantom".into(), Utc::now(), None);
        let result = store
            .clone_list(NewList::clone_of(&phantom, Utc::now()), phantom.id())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
        assert!(store.lists_by_state(ListState::Active).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_list_cascades_to_its_items_only() {
        let store = store().await;
        let doomed = store.insert_list(new_list("doomed")).await.unwrap();
        let kept = store.insert_list(new_list("kept")).await.unwrap();
        store.insert_item(NewItem::add(&doomed, "Milk", "1").unwrap()).await.unwrap();
        store.insert_item(NewItem::add(&kept, "Milk", "2").unwrap()).await.unwrap();

        store.delete_list(doomed.id()).await.unwrap();

        assert!(store.get_list(doomed.id()).await.unwrap().is_none());
        assert!(store.items_for_list(doomed.id()).await.unwrap().is_empty());
        assert_eq!(store.items_for_list(kept.id()).await.unwrap().len(), 1);
        assert!(matches!(store.delete_list(doomed.id()).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn distinct_descriptions_span_all_lists() {
        let store = store().await;
        let a = store.insert_list(new_list("A")).await.unwrap();
        let b = store.insert_list(new_list("B")).await.unwrap();
        for (list, description) in [(&a, "Milk"), (&b, "Bread"), (&b, "Milk"), (&a, "Apples")] {
            store
                .insert_item(NewItem::add(list, description, "1").unwrap())
                .await
                .unwrap();
        }

        assert_eq!(
            store.distinct_descriptions().await.unwrap(),
            vec!["Apples".to_string(), "Bread".to_string(), "Milk".to_string()]
        );
    }

    #[tokio::test]
    async fn catalog_delta_creates_updates_and_deletes() {
        let store = store().await;
        let list = store.insert_list(new_list("Groceries")).await.unwrap();

        let plan = store
            .apply_catalog_delta(&CatalogDelta::parse(&list, "milk", "2").unwrap())
            .await
            .unwrap();
        assert!(matches!(plan, DeltaPlan::Create(_)));
        let items = store.items_for_list(list.id()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity(), 2);

        store
            .apply_catalog_delta(&CatalogDelta::parse(&list, "milk", "1").unwrap())
            .await
            .unwrap();
        assert_eq!(store.items_for_list(list.id()).await.unwrap()[0].quantity(), 3);

        let plan = store
            .apply_catalog_delta(&CatalogDelta::parse(&list, "milk", "-5").unwrap())
            .await
            .unwrap();
        assert!(matches!(plan, DeltaPlan::Delete(_)));
        assert!(store.items_for_list(list.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_item_is_not_found() {
        let store = store().await;
        assert!(matches!(store.delete_item(ItemId::new(1)).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn connect_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shopping.db");

        let store = SqliteStore::connect(&path).await.unwrap();
        store.migrate().await.unwrap();
        store.insert_list(new_list("persisted")).await.unwrap();
        drop(store);

        let reopened = SqliteStore::connect(&path).await.unwrap();
        let lists = reopened.lists_by_state(ListState::Active).await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name(), "persisted");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_catalog_deltas_on_a_file_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::connect(&dir.path().join("shopping.db")).await.unwrap();
        store.migrate().await.unwrap();

        let list = store.insert_list(new_list("Groceries")).await.unwrap();
        let delta = Arc::new(CatalogDelta::parse(&list, "milk", "1").unwrap());
        store.apply_catalog_delta(&delta).await.unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                let delta = Arc::clone(&delta);
                tokio::spawn(async move { store.apply_catalog_delta(&delta).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let items = store.items_for_list(list.id()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity(), 21);
    }
}
