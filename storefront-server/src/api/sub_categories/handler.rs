//! Sub-Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::AppState;
use crate::utils::AppResult;
use shared::models::{SubCategory, SubCategoryCreate, SubCategoryUpdate};

#[derive(Serialize)]
pub struct RecountResponse {
    pub product_count: i64,
}

/// POST /api/sub-categories
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SubCategoryCreate>,
) -> AppResult<Json<SubCategory>> {
    Ok(Json(state.catalog.create_sub_category(payload).await?))
}

/// GET /api/sub-categories/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubCategory>> {
    Ok(Json(state.catalog.get_sub_category(&id).await?))
}

/// PUT /api/sub-categories/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SubCategoryUpdate>,
) -> AppResult<Json<SubCategory>> {
    Ok(Json(state.catalog.update_sub_category(&id, payload).await?))
}

/// DELETE /api/sub-categories/:id - hard delete, guarded by references
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.catalog.delete_sub_category(&id).await?;
    Ok(Json(true))
}

/// POST /api/sub-categories/:id/recount - recompute the product counter
pub async fn recount(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RecountResponse>> {
    let product_count = state.catalog.recount_sub_category(&id).await?;
    Ok(Json(RecountResponse { product_count }))
}
