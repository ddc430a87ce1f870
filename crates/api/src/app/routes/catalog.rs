use std::sync::Arc;

use axum::{
    Form,
    extract::{Extension, Path},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};

use shoplist_core::ListId;

use crate::app::dto::CatalogUpdateForm;
use crate::app::routes::common::{list_url, parse_id};
use crate::app::views::{CatalogPage, render};
use crate::app::{AppServices, errors, flash};

fn catalog_url(id: ListId) -> String {
    format!("{}/catalog", list_url(id))
}

/// GET /lists/:id/catalog - every known description with this list's quantity
pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let id: ListId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let view = match services.catalog(id).await {
        Ok(view) => view,
        Err(e) => return errors::service_error_to_response(e, "/"),
    };
    let message = flash::read(&headers);
    let shown = message.is_some();
    flash::consume(shown, render(&CatalogPage::new(&view, message)))
}

/// POST /lists/:id/catalog/update - apply a quantity delta
pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(body): Form<CatalogUpdateForm>,
) -> Response {
    let id: ListId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let back = catalog_url(id);
    let delta = body.delta.unwrap_or_else(|| "0".to_string());
    match services.apply_catalog_delta(id, &body.description, &delta).await {
        Ok(_) => Redirect::to(&back).into_response(),
        Err(e) => errors::service_error_to_response(e, &back),
    }
}
