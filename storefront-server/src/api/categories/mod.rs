//! Category API module
//!
//! CRUD plus the merchandising surface: homepage showcase membership and
//! ordering, and the per-category featured-product list.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Showcase routes precede /{id} to avoid path conflicts
        .route("/showcase", get(handler::showcase))
        .route("/showcase/repair", post(handler::repair_showcase))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/showcase",
            post(handler::promote)
                .put(handler::reorder)
                .delete(handler::demote),
        )
        .route("/{id}/recount", post(handler::recount))
        .route("/{id}/sub-categories", get(handler::sub_categories))
        .route("/{id}/featured", get(handler::featured))
        .route("/{id}/featured/repair", post(handler::repair_featured))
        .route(
            "/{id}/featured/{product_id}",
            post(handler::promote_product)
                .put(handler::reorder_product)
                .delete(handler::demote_product),
        )
}
