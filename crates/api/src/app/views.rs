//! Page templates and the flat rows they render.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};

use shoplist_core::Entity;
use shoplist_infra::{CatalogView, ListDetail, ListOverview};
use shoplist_lists::{CatalogEntry, Item, ShoppingList};

use crate::app::errors;

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%d.%m.%Y %H:%M").to_string()
}

#[derive(Debug, Clone)]
pub struct ListRow {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub created_at: String,
    /// Empty for active lists.
    pub archived_at: String,
}

impl From<&ShoppingList> for ListRow {
    fn from(list: &ShoppingList) -> Self {
        Self {
            id: list.id().get(),
            name: list.name().to_string(),
            active: list.is_active(),
            created_at: format_timestamp(list.created_at()),
            archived_at: list.archived_at().map(format_timestamp).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemRow {
    pub id: i64,
    pub description: String,
    pub quantity: i64,
    pub done: bool,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().get(),
            description: item.description().to_string(),
            quantity: item.quantity(),
            done: item.is_done(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub flash: String,
    pub active: Vec<ListRow>,
    pub archived: Vec<ListRow>,
}

impl IndexPage {
    pub fn new(overview: &ListOverview, flash: Option<String>) -> Self {
        Self {
            flash: flash.unwrap_or_default(),
            active: overview.active.iter().map(ListRow::from).collect(),
            archived: overview.archived.iter().map(ListRow::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "list.html")]
pub struct ListPage {
    pub flash: String,
    pub list: ListRow,
    pub items: Vec<ItemRow>,
}

impl ListPage {
    pub fn new(detail: &ListDetail, flash: Option<String>) -> Self {
        Self {
            flash: flash.unwrap_or_default(),
            list: ListRow::from(&detail.list),
            items: detail.items.iter().map(ItemRow::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "catalog.html")]
pub struct CatalogPage {
    pub flash: String,
    pub list: ListRow,
    pub entries: Vec<CatalogEntry>,
}

impl CatalogPage {
    pub fn new(view: &CatalogView, flash: Option<String>) -> Self {
        Self {
            flash: flash.unwrap_or_default(),
            list: ListRow::from(&view.list),
            entries: view.entries.clone(),
        }
    }
}

/// Render a template to an HTML response; render failures become a 500.
pub fn render<T: Template>(page: &T) -> Response {
    match page.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template rendering failed");
            errors::internal_error()
        }
    }
}
