//! Database Module
//!
//! Embedded SurrealDB handle plus the persistence gateway the catalog
//! engine talks to. The engine never touches the store directly; every
//! read and write goes through the [`Gateway`] trait so the in-memory
//! implementation can stand in during tests.

pub mod gateway;
pub mod memory;
pub mod surreal;

pub use gateway::{
    BatchOutcome, Document, Filter, Gateway, GatewayError, GatewayResult, WriteOp,
    read_with_retry,
};
pub use memory::MemoryGateway;
pub use surreal::SurrealGateway;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Collection names used across the catalog
pub mod collections {
    pub const CATEGORY: &str = "category";
    pub const SUB_CATEGORY: &str = "sub_category";
    pub const PRODUCT: &str = "product";
}

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed store under `path`
    pub async fn new(path: &str) -> GatewayResult<Self> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| GatewayError::Unavailable(format!("failed to open store: {e}")))?;
        db.use_ns("storefront")
            .use_db("catalog")
            .await
            .map_err(|e| GatewayError::Database(e.to_string()))?;
        tracing::info!(path, "database connection established (SurrealDB RocksDB)");
        Ok(Self { db })
    }
}
