//! Product API module
//!
//! CRUD plus the storefront resolution endpoints: the buyer-facing
//! variant view and quantity availability.

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/view", get(handler::view))
        .route("/{id}/availability", get(handler::availability))
}
