//! Overview, list page and list lifecycle forms.

use std::sync::Arc;

use axum::{
    Form,
    extract::{Extension, Path},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use shoplist_core::{Entity, ListId};
use shoplist_lists::{ActivateOutcome, ArchiveOutcome};

use crate::app::dto::{CreateListForm, RenameListForm};
use crate::app::routes::common::{list_url, parse_id};
use crate::app::views::{IndexPage, ListPage, render};
use crate::app::{AppServices, errors, flash};

/// GET / - active and archived lists
pub async fn index(Extension(services): Extension<Arc<AppServices>>, headers: HeaderMap) -> Response {
    let overview = match services.overview().await {
        Ok(overview) => overview,
        Err(e) => return errors::service_error_to_response(e, "/"),
    };
    let message = flash::read(&headers);
    let shown = message.is_some();
    flash::consume(shown, render(&IndexPage::new(&overview, message)))
}

/// POST /lists - create a list and open it
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Form(body): Form<CreateListForm>,
) -> Response {
    match services.create_list(&body.name, Utc::now()).await {
        Ok(list) => Redirect::to(&list_url(list.id())).into_response(),
        Err(e) => errors::service_error_to_response(e, "/"),
    }
}

/// GET /lists/:id - items of one list
pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let id: ListId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let detail = match services.list_detail(id).await {
        Ok(detail) => detail,
        Err(e) => return errors::service_error_to_response(e, "/"),
    };
    let message = flash::read(&headers);
    let shown = message.is_some();
    flash::consume(shown, render(&ListPage::new(&detail, message)))
}

/// POST /lists/:id/rename
pub async fn rename(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(body): Form<RenameListForm>,
) -> Response {
    let id: ListId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let back = list_url(id);
    match services.rename_list(id, &body.new_name).await {
        Ok(_) => flash::redirect_with(&back, "Einkaufsliste wurde umbenannt."),
        Err(e) => errors::service_error_to_response(e, &back),
    }
}

/// POST /lists/:id/archive
pub async fn archive(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id: ListId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.archive_list(id, Utc::now()).await {
        Ok(ArchiveOutcome::Archived) => flash::redirect_with("/", "Liste wurde archiviert."),
        Ok(ArchiveOutcome::AlreadyArchived) => flash::redirect_with("/", "Liste ist bereits archiviert."),
        Err(e) => errors::service_error_to_response(e, "/"),
    }
}

/// POST /lists/:id/activate - reactivate an archived list under a new name
pub async fn activate(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id: ListId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.activate_list(id, Utc::now()).await {
        Ok(ActivateOutcome::Reactivated) => {
            flash::redirect_with("/", "Archivierte Einkaufsliste wurde reaktiviert und umbenannt.")
        }
        Ok(ActivateOutcome::AlreadyActive) => flash::redirect_with("/", "Liste ist bereits aktiv."),
        Err(e) => errors::service_error_to_response(e, "/"),
    }
}

/// POST /lists/:id/clone - copy a list with all its items
pub async fn clone(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id: ListId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.clone_list(id, Utc::now()).await {
        Ok(copy) => flash::redirect_with(&list_url(copy.id()), "Neue Einkaufsliste aus Archivliste erstellt."),
        Err(e) => errors::service_error_to_response(e, "/"),
    }
}
