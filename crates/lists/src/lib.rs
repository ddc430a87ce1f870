//! Shopping list domain module.
//!
//! This crate contains the business rules for lists, items and the catalog,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//! Timestamps are passed in by callers.

pub mod catalog;
pub mod item;
pub mod list;

pub use catalog::{CatalogDelta, CatalogEntry, DeltaPlan, build_catalog};
pub use item::{Item, NewItem, parse_quantity, validate_description};
pub use list::{ActivateOutcome, ArchiveOutcome, CLONE_SUFFIX, NewList, ShoppingList, reactivation_suffix};
