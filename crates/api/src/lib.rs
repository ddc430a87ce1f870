//! HTTP front end: server-rendered pages and form routes.

pub mod app;
pub mod middleware;
