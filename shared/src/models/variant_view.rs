//! Resolved Variant View
//!
//! The buyer-facing projection of one (size, color) cell of a product's
//! variant matrix.

use serde::{Deserialize, Serialize};

use super::product::Image;

/// A size the buyer can pick for the currently selected color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    pub id: String,
    pub label: String,
    /// Price in cents
    pub price: i64,
    /// Whether this size has units on hand for the selected color
    pub in_stock: bool,
}

/// Effective price/availability/image view for a selected (size, color)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantView {
    /// Selected size (requested, or the product's first size)
    pub size_id: String,
    /// Selected color (requested, or the product's first color)
    pub color_id: String,
    /// Price in cents, read from the selected size
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<i64>,
    /// round(100 * (1 - price/compare_at_price)), 0 when not discounted
    pub discount_percent: u32,
    /// Units on hand for the selected (size, color) pair
    pub stock: u32,
    /// False when the selected pair has zero stock; the selection is
    /// reported as-is, never silently switched
    pub available: bool,
    /// Images of the selected color, or the product image as fallback
    pub images: Vec<Image>,
    /// Sizes with a stock entry for the selected color, in product order
    pub selectable_sizes: Vec<SizeOption>,
}
