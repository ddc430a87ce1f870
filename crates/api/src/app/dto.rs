use serde::Deserialize;

// -------------------------
// Form bodies
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateListForm {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenameListForm {
    pub new_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddItemForm {
    pub description: String,
    /// Blank or missing means 1.
    pub quantity: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogUpdateForm {
    pub description: String,
    /// Missing means "0", i.e. no change.
    pub delta: Option<String>,
}
