//! Sub-Category Model

use serde::{Deserialize, Serialize};

/// Sub-category entity, always owned by one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: Option<String>,
    /// Owning category reference
    pub category_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
    /// Denormalized count of active products in this sub-category
    #[serde(default)]
    pub product_count: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create sub-category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategoryCreate {
    pub category_id: String,
    pub name: String,
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
}

/// Update sub-category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
