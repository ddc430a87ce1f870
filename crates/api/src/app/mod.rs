//! HTTP application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: form bodies
//! - `views.rs`: askama page templates and view rows
//! - `flash.rs`: one-shot flash message cookie
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use shoplist_infra::{ListService, Settings, ShoppingStore, SqliteStore};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod flash;
pub mod routes;
pub mod views;

/// Service handle shared by all handlers.
pub type AppServices = ListService<Arc<dyn ShoppingStore>>;

/// Open the database from `settings`, run migrations and build the router
/// (public entrypoint used by `main.rs`).
pub async fn build_app(settings: &Settings) -> anyhow::Result<Router> {
    let store = SqliteStore::connect(&settings.db_path)
        .await
        .with_context(|| format!("failed to open database at {}", settings.db_path.display()))?;
    store.migrate().await.context("failed to migrate database schema")?;

    Ok(build_router(Arc::new(store)))
}

/// Build the router over an already prepared store.
pub fn build_router(store: Arc<dyn ShoppingStore>) -> Router {
    let services = Arc::new(ListService::new(store));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_log)))
}
