//! Cross-list catalog of item descriptions.
//!
//! The catalog is every distinct description ever used on any list, paired
//! with the quantity one particular list currently holds (0 if absent).
//! Quantities are changed through deltas: positive deltas add or create,
//! negative deltas reduce and delete at zero.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shoplist_core::{DomainError, DomainResult, Entity, ItemId, ListId};

use crate::item::{Item, NewItem};
use crate::list::ShoppingList;

/// One row of the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub description: String,
    pub quantity: i64,
}

/// Merge the global description set with the items of one list.
///
/// `descriptions` may arrive unsorted or with duplicates; the result is
/// sorted ascending and contains each description once. When a list holds
/// several items with the same description the one with the lowest id
/// counts.
pub fn build_catalog<I>(descriptions: I, list_items: &[Item]) -> Vec<CatalogEntry>
where
    I: IntoIterator<Item = String>,
{
    let mut descriptions: Vec<String> = descriptions.into_iter().collect();
    descriptions.sort();
    descriptions.dedup();

    let mut current: HashMap<&str, &Item> = HashMap::with_capacity(list_items.len());
    for item in list_items {
        current
            .entry(item.description())
            .and_modify(|held| {
                if item.id() < held.id() {
                    *held = item;
                }
            })
            .or_insert(item);
    }

    descriptions
        .into_iter()
        .map(|description| {
            let quantity = current
                .get(description.as_str())
                .map(|item| item.quantity())
                .unwrap_or(0);
            CatalogEntry {
                description,
                quantity,
            }
        })
        .collect()
}

/// A validated quantity change for one description on one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDelta {
    list_id: ListId,
    description: String,
    delta: i64,
}

impl CatalogDelta {
    /// Validate a catalog update request against `list`.
    ///
    /// A missing delta is treated as `"0"` by callers; blank or non-numeric
    /// input is rejected.
    pub fn parse(list: &ShoppingList, description: &str, delta_raw: &str) -> DomainResult<Self> {
        list.ensure_active()?;
        let description = description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("Beschreibung fehlt."));
        }
        let delta = delta_raw
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::validation("Ungültige Änderung der Menge."))?;
        Ok(Self {
            list_id: list.id(),
            description: description.to_string(),
            delta,
        })
    }

    pub fn list_id(&self) -> ListId {
        self.list_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    pub fn is_noop(&self) -> bool {
        self.delta == 0
    }

    /// Decide what to write given the list's current item for this
    /// description, if any.
    pub fn plan(&self, existing: Option<&Item>) -> DeltaPlan {
        if self.delta == 0 {
            return DeltaPlan::Unchanged;
        }
        match existing {
            None if self.delta > 0 => DeltaPlan::Create(NewItem::from_catalog(
                self.list_id,
                self.description.clone(),
                self.delta,
            )),
            None => DeltaPlan::Unchanged,
            Some(item) => {
                let quantity = item.quantity().saturating_add(self.delta);
                if quantity <= 0 {
                    DeltaPlan::Delete(item.id())
                } else {
                    let mut updated = item.clone();
                    updated.set_quantity(quantity);
                    DeltaPlan::Update(updated)
                }
            }
        }
    }
}

/// Write to perform for a [`CatalogDelta`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaPlan {
    Unchanged,
    Create(NewItem),
    Update(Item),
    Delete(ItemId),
}
