//! Catalog Engine
//!
//! The merchandising core: dense rank assignment for showcase/featured
//! scopes ([`rank`]), buyer-facing variant resolution ([`variants`]),
//! legacy record upgrade ([`legacy`]) and denormalized counter upkeep
//! ([`counts`]). Everything here is store-agnostic and reaches the
//! document store only through the [`Gateway`](crate::db::Gateway) trait.

pub mod counts;
pub mod legacy;
pub mod rank;
pub mod variants;

pub use counts::CountKeeper;
pub use legacy::canonicalize;
pub use rank::{RankLedger, RankScope};

use thiserror::Error;

use crate::db::GatewayError;

/// Catalog error taxonomy
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad input or state for the requested operation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Rank outside 1..=count for the scope
    #[error("Invalid rank {rank}: must be between 1 and {count}")]
    InvalidRank { rank: u32, count: u32 },

    /// The scope already holds `limit` members
    #[error("maximum {limit} {scope}")]
    LimitExceeded { scope: String, limit: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Requested quantity exceeds the stock of the selected pair
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// Divergence observed by repair/recount; corrected in place, never
    /// raised mid-operation
    #[error("Inconsistent state: {0}")]
    Inconsistent(String),

    /// Store fault surfaced unchanged
    #[error(transparent)]
    Store(#[from] GatewayError),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
