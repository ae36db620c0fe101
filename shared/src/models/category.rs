//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
    /// Flagged for the homepage showcase strip
    #[serde(default)]
    pub is_showcase: bool,
    /// Dense 1..N rank among showcase categories, None when not showcased
    #[serde(default)]
    pub showcase_rank: Option<u32>,
    /// Banner image shown on the homepage strip
    #[serde(default)]
    pub showcase_image: Option<String>,
    /// Cap on featured products within this category
    #[serde(default = "default_featured_limit")]
    pub featured_product_limit: u32,
    /// Denormalized count of active products in this category
    #[serde(default)]
    pub product_count: i64,
    /// Denormalized count of active sub-categories
    #[serde(default)]
    pub sub_category_count: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

fn default_featured_limit() -> u32 {
    4
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    /// URL slug, derived from the name when absent
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
    pub featured_product_limit: Option<u32>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_product_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showcase_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
