use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shoplist_core::{DomainError, DomainResult, Entity, ListId};

/// Suffix appended to the name of a cloned list.
pub const CLONE_SUFFIX: &str = " (Kopie)";

/// A shopping list as persisted by the store.
///
/// Invariant: `active` is true iff `archived_at` is `None`. Only the
/// transition methods below mutate state, and they keep both in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    id: ListId,
    name: String,
    created_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
    active: bool,
}

/// Outcome of [`ShoppingList::archive`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Archived,
    AlreadyArchived,
}

/// Outcome of [`ShoppingList::activate`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActivateOutcome {
    Reactivated,
    AlreadyActive,
}

impl ShoppingList {
    /// Rebuild a list from stored columns.
    ///
    /// `active` is derived from `archived_at` so a row can never be loaded
    /// in a state that breaks the invariant.
    pub fn restore(
        id: ListId,
        name: String,
        created_at: DateTime<Utc>,
        archived_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            active: archived_at.is_none(),
            archived_at,
        }
    }

    /// Materialize a pending list once the store has assigned an id.
    pub fn from_new(id: ListId, new: NewList) -> Self {
        Self {
            id,
            name: new.name,
            created_at: new.created_at,
            archived_at: None,
            active: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fails with [`DomainError::ArchivedList`] if the list is archived.
    pub fn ensure_active(&self) -> DomainResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(DomainError::ArchivedList)
        }
    }

    /// Rename the list. The new name is trimmed and must not be empty.
    pub fn rename(&mut self, new_name: &str) -> DomainResult<()> {
        self.name = validate_rename(new_name)?;
        Ok(())
    }

    pub fn archive(&mut self, now: DateTime<Utc>) -> ArchiveOutcome {
        if !self.active {
            return ArchiveOutcome::AlreadyArchived;
        }
        self.active = false;
        self.archived_at = Some(now);
        ArchiveOutcome::Archived
    }

    /// Reactivate an archived list.
    ///
    /// Reactivation always renames the list: the reactivation date is
    /// appended to the current name.
    pub fn activate(&mut self, now: DateTime<Utc>) -> DomainResult<ActivateOutcome> {
        if self.active {
            return Ok(ActivateOutcome::AlreadyActive);
        }
        let renamed = format!("{}{}", self.name, reactivation_suffix(now));
        self.rename(&renamed)?;
        self.active = true;
        self.archived_at = None;
        Ok(ActivateOutcome::Reactivated)
    }
}

impl Entity for ShoppingList {
    type Id = ListId;

    fn id(&self) -> ListId {
        self.id
    }
}

/// A list that has been validated but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewList {
    name: String,
    created_at: DateTime<Utc>,
}

impl NewList {
    pub fn new(name: &str, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation(
                "Name der Einkaufsliste darf nicht leer sein.",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Pending copy of `source`, named `"<source name> (Kopie)"`.
    pub fn clone_of(source: &ShoppingList, now: DateTime<Utc>) -> Self {
        Self {
            name: format!("{}{}", source.name, CLONE_SUFFIX),
            created_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Suffix appended on reactivation, e.g. `" (reaktiviert am 19.10.2026)"`.
pub fn reactivation_suffix(now: DateTime<Utc>) -> String {
    format!(" (reaktiviert am {})", now.format("%d.%m.%Y"))
}

fn validate_rename(raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Neuer Name darf nicht leer sein."));
    }
    Ok(trimmed.to_string())
}
