//! Storefront Catalog Server
//!
//! Product-catalog storefront built on an embedded document store. The
//! interesting part is the merchandising engine: dense, gap-free rank
//! assignments for showcase categories and featured products, and
//! resolution of a buyer-facing view from a product's size × color
//! variant matrix.
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # Config, state, server bootstrap
//! ├── db/            # Persistence gateway (SurrealDB + in-memory)
//! ├── catalog/       # Rank ledger, variant resolver, legacy upgrade, counters
//! ├── services/      # CatalogService facade
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Error envelope, logging
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use catalog::CatalogError;
pub use core::{AppState, Config, Server};
pub use db::{Gateway, GatewayError, MemoryGateway, SurrealGateway};
pub use services::CatalogService;
pub use utils::{AppError, AppResponse, AppResult};
