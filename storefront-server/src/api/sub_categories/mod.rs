//! Sub-Category API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/sub-categories", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/recount", post(handler::recount))
}
