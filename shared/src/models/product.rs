//! Product Model
//!
//! Products carry a size × color variant matrix: price lives on the size,
//! stock and images live on the color. Records written before the matrix
//! existed (single price/stock/image-list) still appear in the store; the
//! [`ProductRecord`] sum keeps the two shapes apart so resolution logic
//! never has to probe optional fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An image reference with optional alt text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
        }
    }
}

/// Size option; the price of a (size, color) cell is the size's price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariant {
    pub id: String,
    pub label: String,
    /// Price in cents
    pub price: i64,
    /// Original price in cents when the size is on sale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<i64>,
}

/// Color option; stock is tracked per size in `stock_by_size`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorVariant {
    pub id: String,
    pub label: String,
    /// Hex swatch shown in the color picker, e.g. "#1a1a2e"
    #[serde(default)]
    pub swatch: String,
    #[serde(default)]
    pub images: Vec<Image>,
    /// size id -> units on hand; one entry per size on the product
    #[serde(default)]
    pub stock_by_size: HashMap<String, u32>,
}

/// Canonical product entity
///
/// The variant arrays are required fields: their presence is what
/// distinguishes a canonical record from a legacy one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<String>,
    /// Owning category reference
    pub category_id: String,
    #[serde(default)]
    pub sub_category_id: Option<String>,
    pub name: String,
    pub slug: String,
    /// Primary image, the fallback when a color has none of its own
    #[serde(default)]
    pub image: Option<Image>,
    pub size_variants: Vec<SizeVariant>,
    pub color_variants: Vec<ColorVariant>,
    /// Flagged for the category's highlight section
    #[serde(default)]
    pub is_featured: bool,
    /// Dense 1..N rank among featured products of the category
    #[serde(default)]
    pub featured_rank: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
}

/// Pre-variant product record: one price, one stock figure, one image list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyProduct {
    pub id: Option<String>,
    pub category_id: String,
    #[serde(default)]
    pub sub_category_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    /// Price in cents
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<i64>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_rank: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// A product as it comes out of the store: canonical or legacy.
///
/// Untagged: a record with variant arrays deserializes as canonical,
/// anything else with a top-level price falls through to legacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRecord {
    Canonical(Product),
    Legacy(LegacyProduct),
}

impl ProductRecord {
    pub fn is_legacy(&self) -> bool {
        matches!(self, ProductRecord::Legacy(_))
    }
}

/// Size variant input; the id is assigned by the server when absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeVariantInput {
    pub id: Option<String>,
    pub label: String,
    pub price: i64,
    pub compare_at_price: Option<i64>,
}

/// Color variant input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorVariantInput {
    pub id: Option<String>,
    pub label: String,
    pub swatch: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub stock_by_size: HashMap<String, u32>,
}

/// Create product payload
///
/// Either the variant arrays or the simple `price`/`stock` pair must be
/// given; a simple payload is canonicalized into a one-size one-color
/// matrix on create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub slug: Option<String>,
    pub category_id: String,
    pub sub_category_id: Option<String>,
    pub image: Option<Image>,
    #[serde(default)]
    pub size_variants: Vec<SizeVariantInput>,
    #[serde(default)]
    pub color_variants: Vec<ColorVariantInput>,
    /// Simple-payload price in cents
    pub price: Option<i64>,
    pub compare_at_price: Option<i64>,
    /// Simple-payload stock
    pub stock: Option<u32>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    /// Reassign to another category; clears the sub-category unless a new
    /// one is given in the same payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_variants: Option<Vec<SizeVariantInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_variants: Option<Vec<ColorVariantInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
