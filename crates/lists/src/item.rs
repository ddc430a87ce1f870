use serde::{Deserialize, Serialize};

use shoplist_core::{DomainError, DomainResult, Entity, ItemId, ListId};

use crate::list::ShoppingList;

/// A line on a shopping list.
///
/// Quantity is always ≥ 1; an item whose quantity would drop to zero is
/// deleted instead of stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    list_id: ListId,
    description: String,
    quantity: i64,
    done: bool,
}

impl Item {
    pub fn restore(id: ItemId, list_id: ListId, description: String, quantity: i64, done: bool) -> Self {
        Self {
            id,
            list_id,
            description,
            quantity,
            done,
        }
    }

    pub fn from_new(id: ItemId, new: NewItem) -> Self {
        Self {
            id,
            list_id: new.list_id,
            description: new.description,
            quantity: new.quantity,
            done: new.done,
        }
    }

    pub fn list_id(&self) -> ListId {
        self.list_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn set_quantity(&mut self, quantity: i64) {
        debug_assert!(quantity > 0);
        self.quantity = quantity;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

/// An item that has been validated but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    list_id: ListId,
    description: String,
    quantity: i64,
    done: bool,
}

impl NewItem {
    /// Validate an "add item" request against `list`.
    ///
    /// Checks run in order: list must be active, description must not be
    /// blank, quantity must parse as a positive integer (blank means 1).
    pub fn add(list: &ShoppingList, description: &str, quantity_raw: &str) -> DomainResult<Self> {
        list.ensure_active()?;
        let description = validate_description(description)?;
        let quantity = parse_quantity(quantity_raw)?;
        Ok(Self {
            list_id: list.id(),
            description,
            quantity,
            done: false,
        })
    }

    /// Copy of `item` for another list, with `done` reset.
    pub fn copy_of(item: &Item, list_id: ListId) -> Self {
        Self {
            list_id,
            description: item.description.clone(),
            quantity: item.quantity,
            done: false,
        }
    }

    /// Item created by a catalog increment. `quantity` must be positive.
    pub(crate) fn from_catalog(list_id: ListId, description: String, quantity: i64) -> Self {
        debug_assert!(quantity > 0);
        Self {
            list_id,
            description,
            quantity,
            done: false,
        }
    }

    pub fn list_id(&self) -> ListId {
        self.list_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Trimmed, non-empty item description.
pub fn validate_description(raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Beschreibung darf nicht leer sein."));
    }
    Ok(trimmed.to_string())
}

/// Parse a user-entered quantity. Blank input means 1.
pub fn parse_quantity(raw: &str) -> DomainResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(1);
    }
    match raw.parse::<i64>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(DomainError::validation("Menge muss eine positive Zahl sein.")),
    }
}
