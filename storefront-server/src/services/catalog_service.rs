//! Catalog Service - unified category, sub-category and product management
//!
//! The facade admin and storefront handlers talk to. Composes the rank
//! ledger (showcase/featured ordering), the count keeper (denormalized
//! counters) and the variant resolver over one persistence gateway.
//! Counter deltas ride in the same batch as the write that causes them;
//! rank mutations are their own atomic batch.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use shared::models::{
    Category, CategoryCreate, CategoryUpdate, ColorVariant, ColorVariantInput, LegacyProduct,
    Product, ProductCreate, ProductRecord, ProductUpdate, SizeVariant, SizeVariantInput,
    SubCategory, SubCategoryCreate, SubCategoryUpdate, VariantView,
};

use crate::catalog::rank::{RankLedger, RankScope};
use crate::catalog::{CatalogError, CatalogResult, CountKeeper, canonicalize, variants};
use crate::db::{Document, Filter, Gateway, WriteOp, collections, read_with_retry};

#[derive(Clone)]
pub struct CatalogService {
    gateway: Arc<dyn Gateway>,
    ranks: RankLedger,
    counts: CountKeeper,
    showcase_limit: u32,
    default_featured_limit: u32,
}

impl CatalogService {
    pub fn new(gateway: Arc<dyn Gateway>, showcase_limit: u32, default_featured_limit: u32) -> Self {
        Self {
            ranks: RankLedger::new(gateway.clone()),
            counts: CountKeeper::new(gateway.clone()),
            gateway,
            showcase_limit,
            default_featured_limit,
        }
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    fn showcase_scope(&self) -> RankScope {
        RankScope {
            collection: collections::CATEGORY,
            filter: Filter::new().eq("is_showcase", true),
            flag_field: "is_showcase",
            rank_field: "showcase_rank",
            label: "showcase categories",
            limit: self.showcase_limit,
        }
    }

    fn featured_scope(category: &Category) -> RankScope {
        let category_id = category.id.clone().unwrap_or_default();
        RankScope {
            collection: collections::PRODUCT,
            filter: Filter::new()
                .eq("is_featured", true)
                .eq("category_id", category_id),
            flag_field: "is_featured",
            rank_field: "featured_rank",
            label: "featured products",
            limit: category.featured_product_limit,
        }
    }

    // =========================================================================
    // Loading helpers
    // =========================================================================

    async fn load_category(&self, id: &str) -> CatalogResult<Category> {
        let doc = read_with_retry(|| self.gateway.get(collections::CATEGORY, id))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("category:{id}")))?;
        Ok(doc.into_model()?)
    }

    async fn load_sub_category(&self, id: &str) -> CatalogResult<SubCategory> {
        let doc = read_with_retry(|| self.gateway.get(collections::SUB_CATEGORY, id))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("sub_category:{id}")))?;
        Ok(doc.into_model()?)
    }

    async fn load_product_record(&self, id: &str) -> CatalogResult<ProductRecord> {
        let doc = read_with_retry(|| self.gateway.get(collections::PRODUCT, id))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("product:{id}")))?;
        Ok(doc.into_model()?)
    }

    async fn slug_in_use(
        &self,
        collection: &'static str,
        slug: &str,
        exclude: Option<&str>,
    ) -> CatalogResult<bool> {
        let filter = Filter::new().eq("slug", slug);
        let docs = read_with_retry(|| self.gateway.get_all(collection, &filter)).await?;
        Ok(docs.iter().any(|d| Some(d.id.as_str()) != exclude))
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All active categories ordered by sort_order
    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let filter = Filter::new().eq("is_active", true);
        let docs = read_with_retry(|| self.gateway.get_all(collections::CATEGORY, &filter)).await?;
        let mut categories = docs
            .into_iter()
            .map(|d| d.into_model::<Category>())
            .collect::<Result<Vec<_>, _>>()?;
        categories.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        Ok(categories)
    }

    pub async fn get_category(&self, id: &str) -> CatalogResult<Category> {
        self.load_category(id).await
    }

    pub async fn create_category(&self, data: CategoryCreate) -> CatalogResult<Category> {
        if data.name.trim().is_empty() {
            return Err(CatalogError::Validation("category name is required".into()));
        }
        let slug = normalize_slug(data.slug.as_deref(), &data.name);
        if self.slug_in_use(collections::CATEGORY, &slug, None).await? {
            return Err(CatalogError::Validation(format!(
                "category slug '{slug}' already exists"
            )));
        }
        let category = Category {
            id: None,
            name: data.name,
            slug,
            sort_order: data.sort_order.unwrap_or(0),
            is_showcase: false,
            showcase_rank: None,
            showcase_image: None,
            featured_product_limit: data
                .featured_product_limit
                .unwrap_or(self.default_featured_limit),
            product_count: 0,
            sub_category_count: 0,
            is_active: true,
            created_at: now_millis(),
        };
        let id = self
            .gateway
            .create(collections::CATEGORY, Document::from_model(&category)?)
            .await?;
        tracing::info!(category = %id, "category created");
        Ok(Category {
            id: Some(id),
            ..category
        })
    }

    pub async fn update_category(&self, id: &str, data: CategoryUpdate) -> CatalogResult<Category> {
        let existing = self.load_category(id).await?;
        if let Some(slug) = data.slug.as_deref()
            && slug != existing.slug
            && self.slug_in_use(collections::CATEGORY, slug, Some(id)).await?
        {
            return Err(CatalogError::Validation(format!(
                "category slug '{slug}' already exists"
            )));
        }
        // A featured limit below the current member count would break the
        // 1..count invariant for ranks already assigned
        if let Some(limit) = data.featured_product_limit {
            let featured = Filter::new().eq("is_featured", true).eq("category_id", id);
            let count = read_with_retry(|| self.gateway.get_all(collections::PRODUCT, &featured))
                .await?
                .len() as u32;
            if limit < count {
                return Err(CatalogError::Validation(format!(
                    "featured limit {limit} is below the {count} products currently featured"
                )));
            }
        }
        // Deactivating a showcased category pulls it off the homepage first
        if data.is_active == Some(false) && existing.is_showcase {
            self.ranks.demote(&self.showcase_scope(), id).await?;
        }
        let patch = serde_json::to_value(&data).map_err(crate::db::GatewayError::from)?;
        self.gateway.update(collections::CATEGORY, id, patch).await?;
        self.load_category(id).await
    }

    /// Hard delete; refused while active products or sub-categories still
    /// reference the category
    pub async fn delete_category(&self, id: &str) -> CatalogResult<()> {
        let existing = self.load_category(id).await?;
        let products = Filter::new().eq("category_id", id).eq("is_active", true);
        if !read_with_retry(|| self.gateway.get_all(collections::PRODUCT, &products))
            .await?
            .is_empty()
        {
            return Err(CatalogError::Validation(
                "cannot delete a category with active products".into(),
            ));
        }
        let subs = Filter::new().eq("category_id", id).eq("is_active", true);
        if !read_with_retry(|| self.gateway.get_all(collections::SUB_CATEGORY, &subs))
            .await?
            .is_empty()
        {
            return Err(CatalogError::Validation(
                "cannot delete a category with active sub-categories".into(),
            ));
        }
        if existing.is_showcase {
            self.ranks.demote(&self.showcase_scope(), id).await?;
        }
        self.gateway.delete(collections::CATEGORY, id).await?;
        tracing::info!(category = id, "category deleted");
        Ok(())
    }

    // =========================================================================
    // Showcase merchandising
    // =========================================================================

    /// Showcased categories in rank order
    pub async fn showcase_categories(&self) -> CatalogResult<Vec<Category>> {
        let filter = Filter::new().eq("is_showcase", true);
        let docs = read_with_retry(|| self.gateway.get_all(collections::CATEGORY, &filter)).await?;
        let mut categories = docs
            .into_iter()
            .map(|d| d.into_model::<Category>())
            .collect::<Result<Vec<_>, _>>()?;
        categories.sort_by_key(|c| (c.showcase_rank.is_none(), c.showcase_rank));
        Ok(categories)
    }

    /// Add a category to the homepage showcase at the next free rank
    pub async fn promote_category(&self, id: &str) -> CatalogResult<u32> {
        let category = self.load_category(id).await?;
        if !category.is_active {
            return Err(CatalogError::Validation(
                "an inactive category cannot be showcased".into(),
            ));
        }
        self.ranks.promote(&self.showcase_scope(), id).await
    }

    pub async fn demote_category(&self, id: &str) -> CatalogResult<()> {
        self.ranks.demote(&self.showcase_scope(), id).await
    }

    pub async fn reorder_category(&self, id: &str, rank: u32) -> CatalogResult<()> {
        self.ranks.reorder(&self.showcase_scope(), id, rank).await
    }

    /// Renumber showcase ranks into a dense permutation
    pub async fn repair_category_ranks(&self) -> CatalogResult<u32> {
        self.ranks.repair(&self.showcase_scope()).await
    }

    // =========================================================================
    // Sub-categories
    // =========================================================================

    pub async fn list_sub_categories(&self, category_id: &str) -> CatalogResult<Vec<SubCategory>> {
        let filter = Filter::new()
            .eq("category_id", category_id)
            .eq("is_active", true);
        let docs =
            read_with_retry(|| self.gateway.get_all(collections::SUB_CATEGORY, &filter)).await?;
        let mut subs = docs
            .into_iter()
            .map(|d| d.into_model::<SubCategory>())
            .collect::<Result<Vec<_>, _>>()?;
        subs.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        Ok(subs)
    }

    pub async fn get_sub_category(&self, id: &str) -> CatalogResult<SubCategory> {
        self.load_sub_category(id).await
    }

    pub async fn create_sub_category(&self, data: SubCategoryCreate) -> CatalogResult<SubCategory> {
        let parent = self.load_category(&data.category_id).await?;
        if !parent.is_active {
            return Err(CatalogError::Validation(
                "cannot add a sub-category to an inactive category".into(),
            ));
        }
        let slug = normalize_slug(data.slug.as_deref(), &data.name);
        let sub = SubCategory {
            id: None,
            category_id: data.category_id.clone(),
            name: data.name,
            slug,
            sort_order: data.sort_order.unwrap_or(0),
            product_count: 0,
            is_active: true,
            created_at: now_millis(),
        };
        let id = self
            .gateway
            .create(collections::SUB_CATEGORY, Document::from_model(&sub)?)
            .await?;
        let bump = self.counts.bump_category(&data.category_id, 0, 1).await?;
        self.gateway.batch_write(vec![bump]).await?;
        tracing::info!(sub_category = %id, category = %data.category_id, "sub-category created");
        Ok(SubCategory {
            id: Some(id),
            ..sub
        })
    }

    pub async fn update_sub_category(
        &self,
        id: &str,
        data: SubCategoryUpdate,
    ) -> CatalogResult<SubCategory> {
        let existing = self.load_sub_category(id).await?;
        let patch = serde_json::to_value(&data).map_err(crate::db::GatewayError::from)?;
        let mut writes = vec![WriteOp {
            collection: collections::SUB_CATEGORY,
            id: id.to_string(),
            patch,
        }];
        // Activation flips adjust the parent's sub-category counter
        if let Some(active) = data.is_active
            && active != existing.is_active
        {
            let delta = if active { 1 } else { -1 };
            writes.push(
                self.counts
                    .bump_category(&existing.category_id, 0, delta)
                    .await?,
            );
        }
        self.gateway.batch_write(writes).await?;
        self.load_sub_category(id).await
    }

    pub async fn delete_sub_category(&self, id: &str) -> CatalogResult<()> {
        let existing = self.load_sub_category(id).await?;
        let products = Filter::new().eq("sub_category_id", id).eq("is_active", true);
        if !read_with_retry(|| self.gateway.get_all(collections::PRODUCT, &products))
            .await?
            .is_empty()
        {
            return Err(CatalogError::Validation(
                "cannot delete a sub-category with active products".into(),
            ));
        }
        self.gateway.delete(collections::SUB_CATEGORY, id).await?;
        if existing.is_active {
            let bump = self.counts.bump_category(&existing.category_id, 0, -1).await?;
            self.gateway.batch_write(vec![bump]).await?;
        }
        tracing::info!(sub_category = id, "sub-category deleted");
        Ok(())
    }

    pub async fn recount_sub_category(&self, id: &str) -> CatalogResult<i64> {
        self.counts.recount_sub_category(id).await
    }

    pub async fn recount_category(&self, id: &str) -> CatalogResult<(i64, i64)> {
        let counts = self.counts.recount_category(id).await?;
        Ok((counts.product_count, counts.sub_category_count))
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Active products, upgraded to the canonical shape, ordered by name
    pub async fn list_products(&self, category_id: Option<&str>) -> CatalogResult<Vec<Product>> {
        let mut filter = Filter::new().eq("is_active", true);
        if let Some(category_id) = category_id {
            filter = filter.eq("category_id", category_id);
        }
        let docs = read_with_retry(|| self.gateway.get_all(collections::PRODUCT, &filter)).await?;
        let mut products = docs
            .into_iter()
            .map(|d| d.into_model::<ProductRecord>().map(canonicalize))
            .collect::<Result<Vec<_>, _>>()?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    /// One product, upgraded to the canonical shape at read time
    pub async fn get_product(&self, id: &str) -> CatalogResult<Product> {
        Ok(canonicalize(self.load_product_record(id).await?))
    }

    pub async fn create_product(&self, data: ProductCreate) -> CatalogResult<Product> {
        let category = self.load_category(&data.category_id).await?;
        if !category.is_active {
            return Err(CatalogError::Validation(
                "cannot add a product to an inactive category".into(),
            ));
        }
        if let Some(sub_id) = data.sub_category_id.as_deref() {
            let sub = self.load_sub_category(sub_id).await?;
            if sub.category_id != data.category_id {
                return Err(CatalogError::Validation(format!(
                    "sub-category {sub_id} does not belong to category {}",
                    data.category_id
                )));
            }
        }
        let slug = normalize_slug(data.slug.as_deref(), &data.name);
        if self.slug_in_use(collections::PRODUCT, &slug, None).await? {
            return Err(CatalogError::Validation(format!(
                "product slug '{slug}' already exists"
            )));
        }

        let mut product = if !data.size_variants.is_empty() && !data.color_variants.is_empty() {
            Product {
                id: None,
                category_id: data.category_id.clone(),
                sub_category_id: data.sub_category_id.clone(),
                name: data.name,
                slug,
                image: data.image,
                size_variants: materialize_sizes(data.size_variants),
                color_variants: materialize_colors(data.color_variants),
                is_featured: false,
                featured_rank: None,
                is_active: true,
                created_at: now_millis(),
            }
        } else if let Some(price) = data.price {
            // Simple payload: canonicalized through the same path as
            // stored legacy records
            canonicalize(ProductRecord::Legacy(LegacyProduct {
                id: None,
                category_id: data.category_id.clone(),
                sub_category_id: data.sub_category_id.clone(),
                name: data.name,
                slug,
                price,
                compare_at_price: data.compare_at_price,
                stock: data.stock.unwrap_or(0),
                images: data.image.into_iter().collect(),
                is_featured: false,
                featured_rank: None,
                is_active: true,
                created_at: now_millis(),
            }))
        } else {
            return Err(CatalogError::Validation(
                "a product needs size and color variants, or a price".into(),
            ));
        };
        variants::sync_stock_matrix(&mut product);

        let id = self
            .gateway
            .create(collections::PRODUCT, Document::from_model(&product)?)
            .await?;
        let mut bumps = vec![self.counts.bump_category(&data.category_id, 1, 0).await?];
        if let Some(sub_id) = data.sub_category_id.as_deref() {
            bumps.push(self.counts.bump_sub_category(sub_id, 1).await?);
        }
        self.gateway.batch_write(bumps).await?;
        tracing::info!(product = %id, category = %data.category_id, "product created");
        Ok(Product {
            id: Some(id),
            ..product
        })
    }

    /// Update a product. Reassignment moves the counters of both owners;
    /// a featured product is demoted from its old category's scope first.
    /// Saving a legacy record persists the canonical shape.
    pub async fn update_product(&self, id: &str, data: ProductUpdate) -> CatalogResult<Product> {
        let record = self.load_product_record(id).await?;
        let was_legacy = record.is_legacy();
        let mut product = canonicalize(record);
        let old_category = product.category_id.clone();
        let old_sub = product.sub_category_id.clone();
        let was_active = product.is_active;

        if let Some(slug) = data.slug.as_deref()
            && slug != product.slug
            && self.slug_in_use(collections::PRODUCT, slug, Some(id)).await?
        {
            return Err(CatalogError::Validation(format!(
                "product slug '{slug}' already exists"
            )));
        }

        // Apply scalar fields
        if let Some(name) = data.name {
            product.name = name;
        }
        if let Some(slug) = data.slug {
            product.slug = slug;
        }
        if let Some(image) = data.image {
            product.image = Some(image);
        }
        if let Some(sizes) = data.size_variants {
            product.size_variants = materialize_sizes(sizes);
        }
        if let Some(colors) = data.color_variants {
            product.color_variants = materialize_colors(colors);
        }
        if let Some(active) = data.is_active {
            product.is_active = active;
        }

        // Category / sub-category reassignment
        if let Some(new_id) = data.category_id.as_deref()
            && new_id != old_category
        {
            let new_category = self.load_category(new_id).await?;
            if !new_category.is_active {
                return Err(CatalogError::Validation(
                    "cannot move a product into an inactive category".into(),
                ));
            }
            product.category_id = new_id.to_string();
            // The old sub-category belongs to the old category
            product.sub_category_id = None;
        }
        let moving = product.category_id != old_category;
        if let Some(sub_id) = data.sub_category_id {
            let sub = self.load_sub_category(&sub_id).await?;
            if sub.category_id != product.category_id {
                return Err(CatalogError::Validation(format!(
                    "sub-category {sub_id} does not belong to category {}",
                    product.category_id
                )));
            }
            product.sub_category_id = Some(sub_id);
        }

        variants::sync_stock_matrix(&mut product);

        // A featured product leaving its category (or being deactivated)
        // is demoted from the old scope before the move lands
        let leaving_scope = product.is_featured && (moving || (was_active && !product.is_active));
        if leaving_scope {
            let old = self.load_category(&old_category).await?;
            self.ranks.demote(&Self::featured_scope(&old), id).await?;
            product.is_featured = false;
            product.featured_rank = None;
        }

        // Full body merge; stale legacy fields are cleared explicitly
        let mut patch = Document::from_model(&product)?.data;
        if was_legacy && let Some(map) = patch.as_object_mut() {
            map.insert("price".into(), serde_json::Value::Null);
            map.insert("compare_at_price".into(), serde_json::Value::Null);
            map.insert("stock".into(), serde_json::Value::Null);
            map.insert("images".into(), serde_json::Value::Null);
        }
        let mut writes = vec![WriteOp {
            collection: collections::PRODUCT,
            id: id.to_string(),
            patch,
        }];

        // Counter moves ride in the same batch as the product write
        let is_active = product.is_active;
        let new_category = product.category_id.clone();
        let new_sub = product.sub_category_id.clone();
        if was_active && is_active && moving {
            writes.push(self.counts.bump_category(&old_category, -1, 0).await?);
            writes.push(self.counts.bump_category(&new_category, 1, 0).await?);
        } else if was_active && !is_active {
            writes.push(self.counts.bump_category(&old_category, -1, 0).await?);
        } else if !was_active && is_active {
            writes.push(self.counts.bump_category(&new_category, 1, 0).await?);
        }
        if old_sub != new_sub || was_active != is_active {
            if let Some(old_sub) = old_sub.as_deref()
                && was_active
            {
                writes.push(self.counts.bump_sub_category(old_sub, -1).await?);
            }
            if let Some(new_sub) = new_sub.as_deref()
                && is_active
            {
                writes.push(self.counts.bump_sub_category(new_sub, 1).await?);
            }
        }

        self.gateway.batch_write(writes).await?;
        self.get_product(id).await
    }

    /// Soft delete: the product disappears from listings and counters but
    /// the document stays
    pub async fn delete_product(&self, id: &str) -> CatalogResult<()> {
        let record = self.load_product_record(id).await?;
        let product = canonicalize(record);
        if !product.is_active {
            return Ok(());
        }
        if product.is_featured {
            let category = self.load_category(&product.category_id).await?;
            self.ranks
                .demote(&Self::featured_scope(&category), id)
                .await?;
        }
        let mut writes = vec![WriteOp {
            collection: collections::PRODUCT,
            id: id.to_string(),
            patch: json!({ "is_active": false }),
        }];
        writes.push(self.counts.bump_category(&product.category_id, -1, 0).await?);
        if let Some(sub_id) = product.sub_category_id.as_deref() {
            writes.push(self.counts.bump_sub_category(sub_id, -1).await?);
        }
        self.gateway.batch_write(writes).await?;
        tracing::info!(product = id, "product deleted");
        Ok(())
    }

    // =========================================================================
    // Featured merchandising
    // =========================================================================

    /// Featured products of a category in rank order
    pub async fn featured_products(&self, category_id: &str) -> CatalogResult<Vec<Product>> {
        let filter = Filter::new()
            .eq("is_featured", true)
            .eq("category_id", category_id);
        let docs = read_with_retry(|| self.gateway.get_all(collections::PRODUCT, &filter)).await?;
        let mut products = docs
            .into_iter()
            .map(|d| d.into_model::<ProductRecord>().map(canonicalize))
            .collect::<Result<Vec<_>, _>>()?;
        products.sort_by_key(|p| (p.featured_rank.is_none(), p.featured_rank));
        Ok(products)
    }

    async fn featured_target(
        &self,
        id: &str,
        category_id: &str,
    ) -> CatalogResult<(Product, Category)> {
        let product = canonicalize(self.load_product_record(id).await?);
        if product.category_id != category_id {
            return Err(CatalogError::Validation(format!(
                "product {id} does not belong to category {category_id}"
            )));
        }
        let category = self.load_category(category_id).await?;
        Ok((product, category))
    }

    /// Feature a product in its category at the next free rank
    pub async fn promote_product(&self, id: &str, category_id: &str) -> CatalogResult<u32> {
        let (product, category) = self.featured_target(id, category_id).await?;
        if !product.is_active {
            return Err(CatalogError::Validation(
                "an inactive product cannot be featured".into(),
            ));
        }
        self.ranks
            .promote(&Self::featured_scope(&category), id)
            .await
    }

    pub async fn demote_product(&self, id: &str, category_id: &str) -> CatalogResult<()> {
        let (_, category) = self.featured_target(id, category_id).await?;
        self.ranks.demote(&Self::featured_scope(&category), id).await
    }

    pub async fn reorder_product(
        &self,
        id: &str,
        category_id: &str,
        rank: u32,
    ) -> CatalogResult<()> {
        let (_, category) = self.featured_target(id, category_id).await?;
        self.ranks
            .reorder(&Self::featured_scope(&category), id, rank)
            .await
    }

    /// Renumber a category's featured ranks into a dense permutation
    pub async fn repair_product_ranks(&self, category_id: &str) -> CatalogResult<u32> {
        let category = self.load_category(category_id).await?;
        self.ranks.repair(&Self::featured_scope(&category)).await
    }

    // =========================================================================
    // Storefront resolution
    // =========================================================================

    /// Buyer-facing view of one (size, color) selection. Legacy records
    /// are upgraded in memory; nothing is persisted here.
    pub async fn view_product(
        &self,
        id: &str,
        size_id: Option<&str>,
        color_id: Option<&str>,
    ) -> CatalogResult<VariantView> {
        let product = canonicalize(self.load_product_record(id).await?);
        if !product.is_active {
            return Err(CatalogError::NotFound(format!("product:{id}")));
        }
        variants::resolve_variant(&product, size_id, color_id)
    }

    /// Validate an order-line quantity against the selected pair; the
    /// storefront's add-to-cart path clamps instead, via the resolved view
    pub async fn validate_order_quantity(
        &self,
        id: &str,
        size_id: Option<&str>,
        color_id: Option<&str>,
        quantity: u32,
    ) -> CatalogResult<VariantView> {
        let view = self.view_product(id, size_id, color_id).await?;
        variants::check_quantity(quantity, view.stock)?;
        Ok(view)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Use the provided slug or derive one from the name: lowercase
/// alphanumerics with single dashes
fn normalize_slug(slug: Option<&str>, name: &str) -> String {
    let source = match slug {
        Some(s) if !s.trim().is_empty() => s,
        _ => name,
    };
    let mut out = String::with_capacity(source.len());
    let mut dash_pending = false;
    for c in source.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if dash_pending && !out.is_empty() {
                out.push('-');
            }
            dash_pending = false;
            out.push(c.to_ascii_lowercase());
        } else {
            dash_pending = true;
        }
    }
    out
}

fn materialize_sizes(inputs: Vec<SizeVariantInput>) -> Vec<SizeVariant> {
    inputs
        .into_iter()
        .map(|input| SizeVariant {
            id: input.id.unwrap_or_else(new_variant_id),
            label: input.label,
            price: input.price,
            compare_at_price: input.compare_at_price,
        })
        .collect()
}

fn materialize_colors(inputs: Vec<ColorVariantInput>) -> Vec<ColorVariant> {
    inputs
        .into_iter()
        .map(|input| ColorVariant {
            id: input.id.unwrap_or_else(new_variant_id),
            label: input.label,
            swatch: input.swatch.unwrap_or_default(),
            images: input.images,
            stock_by_size: input.stock_by_size,
        })
        .collect()
}

fn new_variant_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_normalized() {
        assert_eq!(normalize_slug(None, "Winter Coats"), "winter-coats");
        assert_eq!(normalize_slug(None, "  Tees & Tops  "), "tees-tops");
        assert_eq!(normalize_slug(Some("custom-slug"), "ignored"), "custom-slug");
        assert_eq!(normalize_slug(Some("  "), "From Name"), "from-name");
    }
}
