use std::time::Instant;

use axum::{http::Request, middleware::Next, response::Response};

/// Log one line per request with its status and latency.
pub async fn request_log(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = started.elapsed();
    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), ?elapsed, "request failed");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), ?elapsed, "request");
    }
    response
}
