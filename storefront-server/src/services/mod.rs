//! Service Layer
//!
//! - [`CatalogService`] - categories, sub-categories, products and the
//!   merchandising operations layered on them

pub mod catalog_service;

pub use catalog_service::CatalogService;
