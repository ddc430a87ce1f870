use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use shoplist_infra::ServiceError;

use crate::app::flash;

/// Flash text for mutations of archived lists.
pub const ARCHIVED_LIST: &str = "Archivierte Listen können nicht geändert werden.";

/// Map a service failure to a response.
///
/// User errors go back to `back_to` with a flash message; unknown ids are a
/// 404; store failures are logged and become a 500.
pub fn service_error_to_response(err: ServiceError, back_to: &str) -> Response {
    match err {
        ServiceError::Validation(msg) => flash::redirect_with(back_to, &msg),
        ServiceError::ArchivedList => flash::redirect_with(back_to, ARCHIVED_LIST),
        ServiceError::NotFound => not_found(),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store operation failed");
            internal_error()
        }
    }
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html("<!doctype html><title>404</title><h1>Nicht gefunden</h1>"),
    )
        .into_response()
}

pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<!doctype html><title>500</title><h1>Interner Fehler</h1>"),
    )
        .into_response()
}
