use std::str::FromStr;

use axum::response::Response;

use crate::app::errors;

/// Parse a path id; anything that is not an integer is an unknown resource.
pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, Response> {
    raw.parse().map_err(|_| errors::not_found())
}

/// Location of a list page.
pub fn list_url(id: impl std::fmt::Display) -> String {
    format!("/lists/{id}")
}
