//! Variant Resolver
//!
//! Pure resolution of the buyer-facing view from a product's size × color
//! matrix. Price reads from the selected size, stock and images from the
//! selected color. A sold-out pair is reported as unavailable; the
//! selection is never switched behind the caller's back.
//!
//! Uses rust_decimal for the discount percentage.

use rust_decimal::prelude::*;
use shared::models::{Product, SizeOption, VariantView};

use super::{CatalogError, CatalogResult};

/// Resolve the effective view for a (size, color) selection. A requested
/// id that is absent or unknown falls back to the first entry.
pub fn resolve_variant(
    product: &Product,
    size_id: Option<&str>,
    color_id: Option<&str>,
) -> CatalogResult<VariantView> {
    if product.size_variants.is_empty() || product.color_variants.is_empty() {
        return Err(CatalogError::Validation(format!(
            "product {} has no variants",
            product.slug
        )));
    }
    let size = select(&product.size_variants, size_id, |s| s.id.as_str());
    let color = select(&product.color_variants, color_id, |c| c.id.as_str());

    let stock = color.stock_by_size.get(&size.id).copied().unwrap_or(0);
    let images = if color.images.is_empty() {
        product.image.clone().into_iter().collect()
    } else {
        color.images.clone()
    };
    let selectable_sizes = product
        .size_variants
        .iter()
        .filter(|s| color.stock_by_size.contains_key(&s.id))
        .map(|s| SizeOption {
            id: s.id.clone(),
            label: s.label.clone(),
            price: s.price,
            in_stock: color.stock_by_size.get(&s.id).is_some_and(|q| *q > 0),
        })
        .collect();

    Ok(VariantView {
        size_id: size.id.clone(),
        color_id: color.id.clone(),
        price: size.price,
        compare_at_price: size.compare_at_price,
        discount_percent: discount_percent(size.price, size.compare_at_price),
        stock,
        available: stock > 0,
        images,
        selectable_sizes,
    })
}

fn select<'a, T>(items: &'a [T], requested: Option<&str>, id: impl Fn(&T) -> &str) -> &'a T {
    requested
        .and_then(|want| items.iter().find(|item| id(item) == want))
        .unwrap_or_else(|| &items[0])
}

/// round(100 * (1 - price/compare_at)), clamped to 0 when there is no
/// discount
pub fn discount_percent(price: i64, compare_at: Option<i64>) -> u32 {
    let Some(compare) = compare_at else { return 0 };
    if compare <= price || compare <= 0 {
        return 0;
    }
    let off = Decimal::from(compare - price) * Decimal::from(100) / Decimal::from(compare);
    off.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Fail when the requested quantity exceeds what the pair can satisfy
pub fn check_quantity(requested: u32, available: u32) -> CatalogResult<()> {
    if requested > available {
        return Err(CatalogError::InsufficientStock {
            requested,
            available,
        });
    }
    Ok(())
}

/// Clamp a requested quantity to the available stock
pub fn clamp_quantity(requested: u32, available: u32) -> u32 {
    requested.min(available)
}

/// Re-sync every color's stock map to the product's current size list:
/// added sizes appear with quantity 0, entries for removed sizes are
/// dropped. Keeps each map at exactly one entry per size.
pub fn sync_stock_matrix(product: &mut Product) {
    let size_ids: Vec<String> = product.size_variants.iter().map(|s| s.id.clone()).collect();
    for color in &mut product.color_variants {
        color.stock_by_size.retain(|key, _| size_ids.iter().any(|s| s == key));
        for size_id in &size_ids {
            color.stock_by_size.entry(size_id.clone()).or_insert(0);
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ColorVariant, Image, SizeVariant};
    use std::collections::HashMap;

    fn make_size(id: &str, label: &str, price: i64, compare_at: Option<i64>) -> SizeVariant {
        SizeVariant {
            id: id.to_string(),
            label: label.to_string(),
            price,
            compare_at_price: compare_at,
        }
    }

    fn make_color(id: &str, images: Vec<Image>, stock: &[(&str, u32)]) -> ColorVariant {
        ColorVariant {
            id: id.to_string(),
            label: id.to_string(),
            swatch: "#000000".to_string(),
            images,
            stock_by_size: stock
                .iter()
                .map(|(size, qty)| (size.to_string(), *qty))
                .collect(),
        }
    }

    fn make_product(sizes: Vec<SizeVariant>, colors: Vec<ColorVariant>) -> Product {
        Product {
            id: Some("p1".to_string()),
            category_id: "c1".to_string(),
            sub_category_id: None,
            name: "Tee".to_string(),
            slug: "tee".to_string(),
            image: Some(Image::new("/img/tee.jpg")),
            size_variants: sizes,
            color_variants: colors,
            is_featured: false,
            featured_rank: None,
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn price_follows_the_selected_size() {
        // S at 500 sold out, M at 700 with 3 units
        let product = make_product(
            vec![make_size("s", "S", 500, None), make_size("m", "M", 700, None)],
            vec![make_color("black", vec![], &[("s", 0), ("m", 3)])],
        );

        let view = resolve_variant(&product, Some("s"), None).unwrap();
        assert_eq!(view.price, 500);
        assert_eq!(view.stock, 0);
        assert!(!view.available);
        // The selection stays on S even though it is sold out
        assert_eq!(view.size_id, "s");

        let view = resolve_variant(&product, Some("m"), None).unwrap();
        assert_eq!(view.price, 700);
        assert_eq!(view.stock, 3);
        assert!(view.available);
    }

    #[test]
    fn unknown_selection_falls_back_to_first_entry() {
        let product = make_product(
            vec![make_size("s", "S", 500, None)],
            vec![
                make_color("black", vec![], &[("s", 2)]),
                make_color("red", vec![], &[("s", 1)]),
            ],
        );
        let view = resolve_variant(&product, Some("xxl"), Some("chartreuse")).unwrap();
        assert_eq!(view.size_id, "s");
        assert_eq!(view.color_id, "black");
    }

    #[test]
    fn color_images_fall_back_to_the_product_image() {
        let product = make_product(
            vec![make_size("s", "S", 500, None)],
            vec![
                make_color("black", vec![Image::new("/img/black.jpg")], &[("s", 1)]),
                make_color("red", vec![], &[("s", 1)]),
            ],
        );
        let view = resolve_variant(&product, None, Some("black")).unwrap();
        assert_eq!(view.images, vec![Image::new("/img/black.jpg")]);

        let view = resolve_variant(&product, None, Some("red")).unwrap();
        assert_eq!(view.images, vec![Image::new("/img/tee.jpg")]);
    }

    #[test]
    fn selectable_sizes_follow_stock_entries_of_the_color() {
        let product = make_product(
            vec![
                make_size("s", "S", 500, None),
                make_size("m", "M", 700, None),
                make_size("l", "L", 700, None),
            ],
            // no entry for L at all, zero entry for S
            vec![make_color("black", vec![], &[("s", 0), ("m", 4)])],
        );
        let view = resolve_variant(&product, None, None).unwrap();
        let ids: Vec<&str> = view.selectable_sizes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s", "m"]);
        assert!(!view.selectable_sizes[0].in_stock);
        assert!(view.selectable_sizes[1].in_stock);
    }

    #[test]
    fn discount_percent_rounds_half_up_and_never_goes_negative() {
        assert_eq!(discount_percent(700, Some(1000)), 30);
        assert_eq!(discount_percent(666, Some(1000)), 33);
        assert_eq!(discount_percent(665, Some(1000)), 34); // 33.5 rounds up
        assert_eq!(discount_percent(1000, Some(1000)), 0);
        assert_eq!(discount_percent(1200, Some(1000)), 0);
        assert_eq!(discount_percent(700, None), 0);
    }

    #[test]
    fn quantity_check_and_clamp() {
        assert!(check_quantity(3, 3).is_ok());
        let err = check_quantity(4, 3).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InsufficientStock {
                requested: 4,
                available: 3
            }
        ));
        assert_eq!(clamp_quantity(4, 3), 3);
        assert_eq!(clamp_quantity(2, 3), 2);
    }

    #[test]
    fn resolving_a_variant_less_product_fails() {
        let product = make_product(vec![], vec![]);
        assert!(matches!(
            resolve_variant(&product, None, None),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn sync_stock_matrix_adds_and_drops_entries() {
        let mut product = make_product(
            vec![make_size("s", "S", 500, None), make_size("m", "M", 700, None)],
            vec![make_color("black", vec![], &[("s", 2), ("xl", 9)])],
        );
        sync_stock_matrix(&mut product);

        let stock = &product.color_variants[0].stock_by_size;
        let mut keys: Vec<&str> = stock.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["m", "s"]);
        assert_eq!(stock["s"], 2);
        assert_eq!(stock["m"], 0);

        let expected: HashMap<String, u32> = stock.clone();
        sync_stock_matrix(&mut product);
        assert_eq!(product.color_variants[0].stock_by_size, expected);
    }
}
