//! Legacy Product Upgrade
//!
//! Products written before the variant matrix existed carry one price,
//! one stock figure and a flat image list. They are upgraded to the
//! canonical size/color shape at read time; the canonical form reaches
//! the store only through an explicit save, never implicitly.

use std::collections::HashMap;

use shared::models::{ColorVariant, LegacyProduct, Product, ProductRecord, SizeVariant};

/// Id and label of the synthesized single size. Fixed ids keep the
/// upgrade deterministic: the upgrader runs on every read, so a buyer's
/// selection must resolve to the same variant across requests.
pub const STANDARD_SIZE_ID: &str = "standard";
pub const STANDARD_SIZE_LABEL: &str = "Standard";
/// Id and label of the synthesized single color
pub const DEFAULT_COLOR_ID: &str = "default";
pub const DEFAULT_COLOR_LABEL: &str = "Default";

/// Upgrade a record to the canonical shape. Canonical records pass
/// through untouched, which makes the operation idempotent.
pub fn canonicalize(record: ProductRecord) -> Product {
    match record {
        ProductRecord::Canonical(product) => product,
        ProductRecord::Legacy(legacy) => upgrade(legacy),
    }
}

fn upgrade(legacy: LegacyProduct) -> Product {
    let size = SizeVariant {
        id: STANDARD_SIZE_ID.to_string(),
        label: STANDARD_SIZE_LABEL.to_string(),
        price: legacy.price,
        compare_at_price: legacy.compare_at_price,
    };
    let mut stock_by_size = HashMap::new();
    stock_by_size.insert(size.id.clone(), legacy.stock);

    let primary_image = legacy.images.first().cloned();
    let color = ColorVariant {
        id: DEFAULT_COLOR_ID.to_string(),
        label: DEFAULT_COLOR_LABEL.to_string(),
        swatch: String::new(),
        images: legacy.images,
        stock_by_size,
    };

    Product {
        id: legacy.id,
        category_id: legacy.category_id,
        sub_category_id: legacy.sub_category_id,
        name: legacy.name,
        slug: legacy.slug,
        image: primary_image,
        size_variants: vec![size],
        color_variants: vec![color],
        is_featured: legacy.is_featured,
        featured_rank: legacy.featured_rank,
        is_active: legacy.is_active,
        created_at: legacy.created_at,
    }
}
