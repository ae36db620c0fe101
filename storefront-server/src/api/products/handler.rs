//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::catalog::variants::clamp_quantity;
use crate::core::AppState;
use crate::utils::AppResult;
use shared::models::{Product, ProductCreate, ProductUpdate, VariantView};

#[derive(Deserialize)]
pub struct ListQuery {
    /// Restrict to one category
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct SelectionQuery {
    pub size: Option<String>,
    pub color: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub size: Option<String>,
    pub color: Option<String>,
    /// Desired quantity; defaults to 1
    pub qty: Option<u32>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub size_id: String,
    pub color_id: String,
    pub stock: u32,
    pub requested: u32,
    /// Requested quantity clamped to what the pair can satisfy
    pub clamped: u32,
    pub available: bool,
}

/// GET /api/products?category=:id - active products, canonical shape
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(
        state.catalog.list_products(query.category.as_deref()).await?,
    ))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.catalog.get_product(&id).await?))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.catalog.create_product(payload).await?))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.catalog.update_product(&id, payload).await?))
}

/// DELETE /api/products/:id - soft delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.catalog.delete_product(&id).await?;
    Ok(Json(true))
}

/// GET /api/products/:id/view?size=&color= - resolved variant view
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> AppResult<Json<VariantView>> {
    Ok(Json(
        state
            .catalog
            .view_product(&id, query.size.as_deref(), query.color.as_deref())
            .await?,
    ))
}

/// GET /api/products/:id/availability?size=&color=&qty= - clamped quantity
/// for the selected pair
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let view = state
        .catalog
        .view_product(&id, query.size.as_deref(), query.color.as_deref())
        .await?;
    let requested = query.qty.unwrap_or(1);
    Ok(Json(AvailabilityResponse {
        size_id: view.size_id,
        color_id: view.color_id,
        stock: view.stock,
        requested,
        clamped: clamp_quantity(requested, view.stock),
        available: view.available,
    }))
}
