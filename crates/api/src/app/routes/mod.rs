use axum::{
    Router,
    routing::{get, post},
};

pub mod catalog;
pub mod common;
pub mod items;
pub mod lists;
pub mod system;

/// Router for every page and form target.
pub fn router() -> Router {
    Router::new()
        .route("/", get(lists::index))
        .route("/lists", post(lists::create))
        .route("/lists/:id", get(lists::show))
        .route("/lists/:id/rename", post(lists::rename))
        .route("/lists/:id/archive", post(lists::archive))
        .route("/lists/:id/activate", post(lists::activate))
        .route("/lists/:id/clone", post(lists::clone))
        .route("/lists/:id/items", post(items::add))
        .route("/lists/:id/catalog", get(catalog::show))
        .route("/lists/:id/catalog/update", post(catalog::update))
        .route("/items/:id/delete", post(items::delete))
}
