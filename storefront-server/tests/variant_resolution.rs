//! Variant resolution and legacy upgrade through the service facade.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use shared::models::{
    CategoryCreate, ColorVariantInput, Image, ProductCreate, ProductUpdate, SizeVariantInput,
};
use storefront_server::db::{Document, Gateway, MemoryGateway, collections};
use storefront_server::{CatalogError, CatalogService};

fn service() -> (Arc<MemoryGateway>, CatalogService) {
    let gateway = Arc::new(MemoryGateway::new());
    let catalog = CatalogService::new(gateway.clone(), 6, 4);
    (gateway, catalog)
}

async fn make_category(catalog: &CatalogService, name: &str) -> String {
    catalog
        .create_category(CategoryCreate {
            name: name.to_string(),
            slug: None,
            sort_order: None,
            featured_product_limit: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

fn size(id: &str, label: &str, price: i64, compare_at: Option<i64>) -> SizeVariantInput {
    SizeVariantInput {
        id: Some(id.to_string()),
        label: label.to_string(),
        price,
        compare_at_price: compare_at,
    }
}

fn color(id: &str, images: Vec<Image>, stock: &[(&str, u32)]) -> ColorVariantInput {
    ColorVariantInput {
        id: Some(id.to_string()),
        label: id.to_string(),
        swatch: Some("#222222".to_string()),
        images,
        stock_by_size: stock
            .iter()
            .map(|(size_id, qty)| (size_id.to_string(), *qty))
            .collect(),
    }
}

async fn make_variant_product(
    catalog: &CatalogService,
    category_id: &str,
    name: &str,
    sizes: Vec<SizeVariantInput>,
    colors: Vec<ColorVariantInput>,
) -> String {
    catalog
        .create_product(ProductCreate {
            name: name.to_string(),
            slug: None,
            category_id: category_id.to_string(),
            sub_category_id: None,
            image: Some(Image::new("/img/primary.jpg")),
            size_variants: sizes,
            color_variants: colors,
            price: None,
            compare_at_price: None,
            stock: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

#[tokio::test]
async fn price_and_stock_follow_the_selected_size() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Apparel").await;
    let product = make_variant_product(
        &catalog,
        &category,
        "Tee",
        vec![size("s", "S", 500, None), size("m", "M", 700, None)],
        vec![color("black", vec![], &[("s", 0), ("m", 3)])],
    )
    .await;

    let view = catalog.view_product(&product, Some("s"), None).await.unwrap();
    assert_eq!(view.price, 500);
    assert_eq!(view.stock, 0);
    assert!(!view.available);
    assert_eq!(view.size_id, "s", "sold-out selection must not be switched");

    let view = catalog.view_product(&product, Some("m"), None).await.unwrap();
    assert_eq!(view.price, 700);
    assert_eq!(view.stock, 3);
    assert!(view.available);
}

#[tokio::test]
async fn color_images_fall_back_to_the_primary_image() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Apparel").await;
    let product = make_variant_product(
        &catalog,
        &category,
        "Tee",
        vec![size("s", "S", 500, None)],
        vec![
            color("black", vec![Image::new("/img/black.jpg")], &[("s", 2)]),
            color("red", vec![], &[("s", 2)]),
        ],
    )
    .await;

    let view = catalog
        .view_product(&product, None, Some("black"))
        .await
        .unwrap();
    assert_eq!(view.images, vec![Image::new("/img/black.jpg")]);

    let view = catalog
        .view_product(&product, None, Some("red"))
        .await
        .unwrap();
    assert_eq!(view.images, vec![Image::new("/img/primary.jpg")]);
}

#[tokio::test]
async fn discount_comes_from_the_size_compare_price() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Apparel").await;
    let product = make_variant_product(
        &catalog,
        &category,
        "Coat",
        vec![size("s", "S", 700, Some(1000)), size("m", "M", 900, Some(900))],
        vec![color("navy", vec![], &[("s", 1), ("m", 1)])],
    )
    .await;

    let view = catalog.view_product(&product, Some("s"), None).await.unwrap();
    assert_eq!(view.compare_at_price, Some(1000));
    assert_eq!(view.discount_percent, 30);

    let view = catalog.view_product(&product, Some("m"), None).await.unwrap();
    assert_eq!(view.discount_percent, 0);
}

#[tokio::test]
async fn legacy_records_resolve_through_the_upgrade_path() {
    let (gateway, catalog) = service();
    let category = make_category(&catalog, "Kitchen").await;

    // A pre-variant document seeded directly into the store
    gateway
        .create(
            collections::PRODUCT,
            Document::new(
                "mug1",
                json!({
                    "category_id": category,
                    "name": "Old Mug",
                    "slug": "old-mug",
                    "price": 1250,
                    "compare_at_price": 2500,
                    "stock": 7,
                    "images": [{"url": "/img/mug.jpg"}],
                    "is_active": true,
                    "created_at": 1,
                }),
            ),
        )
        .await
        .unwrap();

    let view = catalog.view_product("mug1", None, None).await.unwrap();
    assert_eq!(view.price, 1250);
    assert_eq!(view.stock, 7);
    assert_eq!(view.discount_percent, 50);
    assert_eq!(view.images, vec![Image::new("/img/mug.jpg")]);
    assert_eq!(view.selectable_sizes.len(), 1);
    assert_eq!(view.selectable_sizes[0].label, "Standard");

    // The upgrade is read-time only: the stored document keeps its shape
    let stored = gateway
        .get(collections::PRODUCT, "mug1")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.data.get("size_variants").is_none());
    assert_eq!(stored.data["price"], 1250);

    // Upgrading twice yields the same canonical product
    let once = catalog.get_product("mug1").await.unwrap();
    let twice = catalog.get_product("mug1").await.unwrap();
    assert_eq!(once, twice);
}

#[tokio::test]
async fn saving_a_legacy_record_persists_the_canonical_shape() {
    let (gateway, catalog) = service();
    let category = make_category(&catalog, "Kitchen").await;
    gateway
        .create(
            collections::PRODUCT,
            Document::new(
                "mug2",
                json!({
                    "category_id": category,
                    "name": "Old Mug",
                    "slug": "old-mug-2",
                    "price": 900,
                    "stock": 2,
                    "is_active": true,
                    "created_at": 1,
                }),
            ),
        )
        .await
        .unwrap();

    catalog
        .update_product(
            "mug2",
            ProductUpdate {
                name: Some("Restored Mug".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = gateway
        .get(collections::PRODUCT, "mug2")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.data["size_variants"].is_array());
    assert!(stored.data["color_variants"].is_array());
    // Legacy scalar fields are cleared by the explicit save
    assert_eq!(stored.data["price"], serde_json::Value::Null);
    assert_eq!(stored.data["stock"], serde_json::Value::Null);

    let product = catalog.get_product("mug2").await.unwrap();
    assert_eq!(product.name, "Restored Mug");
    assert_eq!(product.size_variants[0].price, 900);
    assert_eq!(product.color_variants[0].stock_by_size["standard"], 2);
}

#[tokio::test]
async fn editing_sizes_resyncs_every_color_stock_map() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Apparel").await;
    let product = make_variant_product(
        &catalog,
        &category,
        "Tee",
        vec![size("s", "S", 500, None), size("m", "M", 700, None)],
        vec![color("black", vec![], &[("s", 2), ("m", 1)])],
    )
    .await;

    // Replace the size list: S is gone, L is new
    let updated = catalog
        .update_product(
            &product,
            ProductUpdate {
                size_variants: Some(vec![
                    size("m", "M", 700, None),
                    size("l", "L", 800, None),
                ]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stock = &updated.color_variants[0].stock_by_size;
    let mut keys: Vec<&str> = stock.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["l", "m"]);
    assert_eq!(stock["m"], 1);
    assert_eq!(stock["l"], 0);

    let expected: HashMap<String, u32> = stock.clone();
    // A second no-op save leaves the matrix untouched
    let again = catalog
        .update_product(&product, ProductUpdate::default())
        .await
        .unwrap();
    assert_eq!(again.color_variants[0].stock_by_size, expected);
}

#[tokio::test]
async fn order_quantities_beyond_stock_fail_typed() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Apparel").await;
    let product = make_variant_product(
        &catalog,
        &category,
        "Tee",
        vec![size("s", "S", 500, None)],
        vec![color("black", vec![], &[("s", 3)])],
    )
    .await;

    catalog
        .validate_order_quantity(&product, Some("s"), Some("black"), 3)
        .await
        .unwrap();

    let err = catalog
        .validate_order_quantity(&product, Some("s"), Some("black"), 4)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InsufficientStock {
            requested: 4,
            available: 3
        }
    ));
}

#[tokio::test]
async fn inactive_products_do_not_resolve() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Apparel").await;
    let product = make_variant_product(
        &catalog,
        &category,
        "Tee",
        vec![size("s", "S", 500, None)],
        vec![color("black", vec![], &[("s", 3)])],
    )
    .await;
    catalog.delete_product(&product).await.unwrap();

    let err = catalog.view_product(&product, None, None).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}
