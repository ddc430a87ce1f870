//! `shoplist-core`: identifiers, the entity trait and domain errors.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, ListId};
