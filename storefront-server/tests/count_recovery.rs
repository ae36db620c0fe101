//! Denormalized counter upkeep and recount recovery.

use std::sync::Arc;

use serde_json::json;
use shared::models::{CategoryCreate, ProductCreate, ProductUpdate, SubCategoryCreate};
use storefront_server::db::{Gateway, MemoryGateway, collections};
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

async fn make_sub_category(catalog: &CatalogService, category_id: &str, name: &str) -> String {
    catalog
        .create_sub_category(SubCategoryCreate {
            category_id: category_id.to_string(),
            name: name.to_string(),
            slug: None,
            sort_order: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

async fn make_product(
    catalog: &CatalogService,
    category_id: &str,
    sub_category_id: Option<&str>,
    name: &str,
) -> String {
    catalog
        .create_product(ProductCreate {
            name: name.to_string(),
            slug: None,
            category_id: category_id.to_string(),
            sub_category_id: sub_category_id.map(str::to_string),
            image: None,
            size_variants: Vec::new(),
            color_variants: Vec::new(),
            price: Some(1500),
            compare_at_price: None,
            stock: Some(10),
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

#[tokio::test]
async fn counters_follow_creates_and_deletes() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Garden").await;
    let sub = make_sub_category(&catalog, &category, "Tools").await;

    let mut products = Vec::new();
    for i in 0..5 {
        let sub_ref = (i < 2).then_some(sub.as_str());
        products.push(make_product(&catalog, &category, sub_ref, &format!("Item {i}")).await);
    }

    let loaded = catalog.get_category(&category).await.unwrap();
    assert_eq!(loaded.product_count, 5);
    assert_eq!(loaded.sub_category_count, 1);
    assert_eq!(
        catalog.get_sub_category(&sub).await.unwrap().product_count,
        2
    );

    // Soft-deleting two products decrements the owners
    catalog.delete_product(&products[0]).await.unwrap();
    catalog.delete_product(&products[4]).await.unwrap();
    // A repeated delete is a no-op
    catalog.delete_product(&products[0]).await.unwrap();

    let loaded = catalog.get_category(&category).await.unwrap();
    assert_eq!(loaded.product_count, 3);
    assert_eq!(
        catalog.get_sub_category(&sub).await.unwrap().product_count,
        1
    );
}

#[tokio::test]
async fn recount_overwrites_whatever_is_stored() {
    let (gateway, catalog) = service();
    let category = make_category(&catalog, "Garden").await;
    let mut products = Vec::new();
    for i in 0..5 {
        products.push(make_product(&catalog, &category, None, &format!("Item {i}")).await);
    }
    catalog.delete_product(&products[0]).await.unwrap();
    catalog.delete_product(&products[1]).await.unwrap();

    // Corrupt the stored counter to something absurd
    gateway
        .update(
            collections::CATEGORY,
            &category,
            json!({"product_count": 4000, "sub_category_count": -3}),
        )
        .await
        .unwrap();

    let (product_count, sub_category_count) = catalog.recount_category(&category).await.unwrap();
    assert_eq!(product_count, 3);
    assert_eq!(sub_category_count, 0);

    let loaded = catalog.get_category(&category).await.unwrap();
    assert_eq!(loaded.product_count, 3);
    assert_eq!(loaded.sub_category_count, 0);
}

#[tokio::test]
async fn recount_sub_category_counts_active_references_only() {
    let (gateway, catalog) = service();
    let category = make_category(&catalog, "Garden").await;
    let sub = make_sub_category(&catalog, &category, "Tools").await;
    let p1 = make_product(&catalog, &category, Some(&sub), "Spade").await;
    let _p2 = make_product(&catalog, &category, Some(&sub), "Rake").await;
    catalog.delete_product(&p1).await.unwrap();

    gateway
        .update(
            collections::SUB_CATEGORY,
            &sub,
            json!({"product_count": 99}),
        )
        .await
        .unwrap();

    assert_eq!(catalog.recount_sub_category(&sub).await.unwrap(), 1);
    assert_eq!(
        catalog.get_sub_category(&sub).await.unwrap().product_count,
        1
    );
}

#[tokio::test]
async fn reassignment_moves_the_counters() {
    let (_, catalog) = service();
    let a = make_category(&catalog, "Garden").await;
    let b = make_category(&catalog, "Workshop").await;
    let sub_a = make_sub_category(&catalog, &a, "Tools").await;
    let sub_b = make_sub_category(&catalog, &b, "Benches").await;
    let product = make_product(&catalog, &a, Some(&sub_a), "Spade").await;

    let moved = catalog
        .update_product(
            &product,
            ProductUpdate {
                category_id: Some(b.clone()),
                sub_category_id: Some(sub_b.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.category_id, b);
    assert_eq!(moved.sub_category_id, Some(sub_b.clone()));

    assert_eq!(catalog.get_category(&a).await.unwrap().product_count, 0);
    assert_eq!(catalog.get_category(&b).await.unwrap().product_count, 1);
    assert_eq!(
        catalog.get_sub_category(&sub_a).await.unwrap().product_count,
        0
    );
    assert_eq!(
        catalog.get_sub_category(&sub_b).await.unwrap().product_count,
        1
    );
}

#[tokio::test]
async fn moving_categories_without_a_new_sub_clears_the_old_one() {
    let (_, catalog) = service();
    let a = make_category(&catalog, "Garden").await;
    let b = make_category(&catalog, "Workshop").await;
    let sub_a = make_sub_category(&catalog, &a, "Tools").await;
    let product = make_product(&catalog, &a, Some(&sub_a), "Spade").await;

    let moved = catalog
        .update_product(
            &product,
            ProductUpdate {
                category_id: Some(b.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.sub_category_id, None);
    assert_eq!(
        catalog.get_sub_category(&sub_a).await.unwrap().product_count,
        0
    );
}

#[tokio::test]
async fn cross_category_sub_assignment_is_rejected() {
    let (_, catalog) = service();
    let a = make_category(&catalog, "Garden").await;
    let b = make_category(&catalog, "Workshop").await;
    let sub_b = make_sub_category(&catalog, &b, "Benches").await;

    let err = catalog
        .create_product(ProductCreate {
            name: "Spade".to_string(),
            slug: None,
            category_id: a.clone(),
            sub_category_id: Some(sub_b),
            image: None,
            size_variants: Vec::new(),
            color_variants: Vec::new(),
            price: Some(1500),
            compare_at_price: None,
            stock: Some(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn guarded_deletes_protect_referenced_owners() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Garden").await;
    let sub = make_sub_category(&catalog, &category, "Tools").await;
    let product = make_product(&catalog, &category, Some(&sub), "Spade").await;

    assert!(matches!(
        catalog.delete_sub_category(&sub).await.unwrap_err(),
        CatalogError::Validation(_)
    ));
    assert!(matches!(
        catalog.delete_category(&category).await.unwrap_err(),
        CatalogError::Validation(_)
    ));

    // Once the product is gone both deletes go through
    catalog.delete_product(&product).await.unwrap();
    catalog.delete_sub_category(&sub).await.unwrap();
    catalog.delete_category(&category).await.unwrap();
    assert!(matches!(
        catalog.get_category(&category).await.unwrap_err(),
        CatalogError::NotFound(_)
    ));
}

#[tokio::test]
async fn deactivating_and_reactivating_a_product_moves_the_counters() {
    let (_, catalog) = service();
    let category = make_category(&catalog, "Garden").await;
    let product = make_product(&catalog, &category, None, "Spade").await;
    assert_eq!(catalog.get_category(&category).await.unwrap().product_count, 1);

    catalog
        .update_product(
            &product,
            ProductUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(catalog.get_category(&category).await.unwrap().product_count, 0);

    catalog
        .update_product(
            &product,
            ProductUpdate {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(catalog.get_category(&category).await.unwrap().product_count, 1);
}
