//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::AppState;
use crate::utils::AppResult;
use shared::models::{Category, CategoryCreate, CategoryUpdate, Product, SubCategory};

#[derive(Serialize)]
pub struct RankResponse {
    pub rank: u32,
}

#[derive(Serialize)]
pub struct RepairResponse {
    /// Scope member count after renumbering
    pub members: u32,
}

#[derive(Serialize)]
pub struct RecountResponse {
    pub product_count: i64,
    pub sub_category_count: i64,
}

#[derive(Deserialize)]
pub struct ReorderPayload {
    pub rank: u32,
}

/// GET /api/categories - all active categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.list_categories().await?))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.get_category(&id).await?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.create_category(payload).await?))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.update_category(&id, payload).await?))
}

/// DELETE /api/categories/:id - hard delete, guarded by references
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.catalog.delete_category(&id).await?;
    Ok(Json(true))
}

/// GET /api/categories/showcase - showcased categories in rank order
pub async fn showcase(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.showcase_categories().await?))
}

/// POST /api/categories/:id/showcase - promote onto the homepage
pub async fn promote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RankResponse>> {
    let rank = state.catalog.promote_category(&id).await?;
    Ok(Json(RankResponse { rank }))
}

/// PUT /api/categories/:id/showcase - move to a new rank
pub async fn reorder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReorderPayload>,
) -> AppResult<Json<bool>> {
    state.catalog.reorder_category(&id, payload.rank).await?;
    Ok(Json(true))
}

/// DELETE /api/categories/:id/showcase - remove from the homepage
pub async fn demote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.catalog.demote_category(&id).await?;
    Ok(Json(true))
}

/// POST /api/categories/showcase/repair - renumber showcase ranks
pub async fn repair_showcase(State(state): State<AppState>) -> AppResult<Json<RepairResponse>> {
    let members = state.catalog.repair_category_ranks().await?;
    Ok(Json(RepairResponse { members }))
}

/// POST /api/categories/:id/recount - recompute denormalized counters
pub async fn recount(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RecountResponse>> {
    let (product_count, sub_category_count) = state.catalog.recount_category(&id).await?;
    Ok(Json(RecountResponse {
        product_count,
        sub_category_count,
    }))
}

/// GET /api/categories/:id/sub-categories
pub async fn sub_categories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<SubCategory>>> {
    Ok(Json(state.catalog.list_sub_categories(&id).await?))
}

/// GET /api/categories/:id/featured - featured products in rank order
pub async fn featured(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog.featured_products(&id).await?))
}

/// POST /api/categories/:id/featured/:product_id
pub async fn promote_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
) -> AppResult<Json<RankResponse>> {
    let rank = state.catalog.promote_product(&product_id, &id).await?;
    Ok(Json(RankResponse { rank }))
}

/// PUT /api/categories/:id/featured/:product_id
pub async fn reorder_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
    Json(payload): Json<ReorderPayload>,
) -> AppResult<Json<bool>> {
    state
        .catalog
        .reorder_product(&product_id, &id, payload.rank)
        .await?;
    Ok(Json(true))
}

/// DELETE /api/categories/:id/featured/:product_id
pub async fn demote_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    state.catalog.demote_product(&product_id, &id).await?;
    Ok(Json(true))
}

/// POST /api/categories/:id/featured/repair - renumber featured ranks
pub async fn repair_featured(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RepairResponse>> {
    let members = state.catalog.repair_product_ranks(&id).await?;
    Ok(Json(RepairResponse { members }))
}
