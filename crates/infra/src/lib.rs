//! Infrastructure layer: SQLite persistence, configuration, and the
//! application service the HTTP layer calls into.

pub mod config;
pub mod service;
pub mod store;

pub use config::Settings;
pub use service::{CatalogView, ListDetail, ListOverview, ListService, ServiceError, ServiceResult};
pub use store::{InMemoryStore, ListState, ShoppingStore, SqliteStore, StoreError};
