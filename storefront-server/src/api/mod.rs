//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`categories`] - category CRUD, showcase and featured merchandising
//! - [`sub_categories`] - sub-category CRUD and recount
//! - [`products`] - product CRUD and storefront variant resolution

pub mod categories;
pub mod health;
pub mod products;
pub mod sub_categories;

use axum::Router;

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(sub_categories::router())
        .merge(products::router())
}
