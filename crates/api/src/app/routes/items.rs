use std::sync::Arc;

use axum::{
    Form,
    extract::{Extension, Path},
    response::{IntoResponse, Redirect, Response},
};

use shoplist_core::{ItemId, ListId};
use shoplist_infra::ServiceError;

use crate::app::dto::AddItemForm;
use crate::app::routes::common::{list_url, parse_id};
use crate::app::{AppServices, errors, flash};

/// Flash text when adding to an archived list.
pub const ADD_TO_ARCHIVED: &str = "Zu einer archivierten Liste können keine neuen Positionen hinzugefügt werden.";

/// POST /lists/:id/items
pub async fn add(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(body): Form<AddItemForm>,
) -> Response {
    let id: ListId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let back = list_url(id);
    let quantity = body.quantity.unwrap_or_default();
    match services.add_item(id, &body.description, &quantity).await {
        Ok(_) => Redirect::to(&back).into_response(),
        Err(ServiceError::ArchivedList) => flash::redirect_with(&back, ADD_TO_ARCHIVED),
        Err(e) => errors::service_error_to_response(e, &back),
    }
}

/// POST /items/:id/delete
pub async fn delete(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id: ItemId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_item(id).await {
        Ok(list_id) => flash::redirect_with(&list_url(list_id), "Position gelöscht."),
        Err(e) => errors::service_error_to_response(e, "/"),
    }
}
