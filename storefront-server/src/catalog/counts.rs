//! Catalog Count Keeper
//!
//! Maintains the denormalized product / sub-category counters stored on
//! owning documents. Deltas are planned as write ops that ride in the
//! same batch as the mutation that caused them; racing writers can still
//! leave a counter stale, and the recount operations are the recovery:
//! they recompute from the referencing collection and overwrite whatever
//! is stored.

use std::sync::Arc;

use serde_json::{Value, json};

use super::{CatalogError, CatalogResult};
use crate::db::{Filter, Gateway, WriteOp, collections, read_with_retry};

#[derive(Clone)]
pub struct CountKeeper {
    gateway: Arc<dyn Gateway>,
}

/// Authoritative counters of one category after a recount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCounts {
    pub product_count: i64,
    pub sub_category_count: i64,
}

impl CountKeeper {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    fn counter(data: &Value, field: &str) -> i64 {
        data.get(field).and_then(Value::as_i64).unwrap_or(0)
    }

    /// Plan a counter bump on a category. Counters never go below zero.
    pub async fn bump_category(
        &self,
        id: &str,
        product_delta: i64,
        sub_category_delta: i64,
    ) -> CatalogResult<WriteOp> {
        let doc = read_with_retry(|| self.gateway.get(collections::CATEGORY, id))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("category:{id}")))?;
        let products = Self::counter(&doc.data, "product_count") + product_delta;
        let subs = Self::counter(&doc.data, "sub_category_count") + sub_category_delta;
        Ok(WriteOp {
            collection: collections::CATEGORY,
            id: id.to_string(),
            patch: json!({
                "product_count": products.max(0),
                "sub_category_count": subs.max(0),
            }),
        })
    }

    /// Plan a product-counter bump on a sub-category
    pub async fn bump_sub_category(&self, id: &str, product_delta: i64) -> CatalogResult<WriteOp> {
        let doc = read_with_retry(|| self.gateway.get(collections::SUB_CATEGORY, id))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("sub_category:{id}")))?;
        let products = Self::counter(&doc.data, "product_count") + product_delta;
        Ok(WriteOp {
            collection: collections::SUB_CATEGORY,
            id: id.to_string(),
            patch: json!({ "product_count": products.max(0) }),
        })
    }

    /// Recompute a category's counters from the referencing collections
    /// and overwrite the stored values
    pub async fn recount_category(&self, id: &str) -> CatalogResult<CategoryCounts> {
        let doc = read_with_retry(|| self.gateway.get(collections::CATEGORY, id))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("category:{id}")))?;

        let product_filter = Filter::new().eq("category_id", id).eq("is_active", true);
        let products =
            read_with_retry(|| self.gateway.get_all(collections::PRODUCT, &product_filter))
                .await?
                .len() as i64;
        let sub_filter = Filter::new().eq("category_id", id).eq("is_active", true);
        let subs =
            read_with_retry(|| self.gateway.get_all(collections::SUB_CATEGORY, &sub_filter))
                .await?
                .len() as i64;

        let stored_products = Self::counter(&doc.data, "product_count");
        let stored_subs = Self::counter(&doc.data, "sub_category_count");
        if stored_products != products || stored_subs != subs {
            tracing::warn!(
                category = id,
                stored_products,
                actual_products = products,
                stored_subs,
                actual_subs = subs,
                "counter drift corrected"
            );
        }

        self.gateway
            .update(
                collections::CATEGORY,
                id,
                json!({
                    "product_count": products,
                    "sub_category_count": subs,
                }),
            )
            .await?;
        Ok(CategoryCounts {
            product_count: products,
            sub_category_count: subs,
        })
    }

    /// Recompute a sub-category's product counter
    pub async fn recount_sub_category(&self, id: &str) -> CatalogResult<i64> {
        let doc = read_with_retry(|| self.gateway.get(collections::SUB_CATEGORY, id))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("sub_category:{id}")))?;

        let filter = Filter::new().eq("sub_category_id", id).eq("is_active", true);
        let products = read_with_retry(|| self.gateway.get_all(collections::PRODUCT, &filter))
            .await?
            .len() as i64;

        let stored = Self::counter(&doc.data, "product_count");
        if stored != products {
            tracing::warn!(
                sub_category = id,
                stored,
                actual = products,
                "counter drift corrected"
            );
        }

        self.gateway
            .update(
                collections::SUB_CATEGORY,
                id,
                json!({ "product_count": products }),
            )
            .await?;
        Ok(products)
    }
}
