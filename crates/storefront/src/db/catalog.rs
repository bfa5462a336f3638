//! Catalog repository: product and campaign reads, inventory writes.
//!
//! Everything here except [`CatalogRepository::apply_sale`] is read-only.
//! Queries bind at runtime; rows are decoded through the core types, and a
//! row that fails to decode (unknown status, malformed image list) surfaces
//! as `RepositoryError::DataCorruption` rather than panicking.

use sqlx::PgPool;

use clementine_core::{
    BrandId, CampaignId, CampaignStatus, Inventory, ProductId, ProductStatus,
};

use super::RepositoryError;
use crate::models::{Campaign, Product, ProductImage};

/// A product paired with its owning campaign.
///
/// Both rows must exist for the entry to exist; a missing product and a
/// dangling `campaign_id` both read back as `None` from
/// [`CatalogRepository::get_entry`].
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub product: Product,
    pub campaign: Campaign,
}

impl CatalogEntry {
    /// Whether the product may be purchased right now: both the product and
    /// its campaign must be in `active` status.
    #[must_use]
    pub fn purchasable(&self) -> bool {
        self.product.status == ProductStatus::Active
            && self.campaign.status == CampaignStatus::Active
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    campaign_id: i32,
    name: String,
    description: Option<String>,
    status: String,
    original_price: rust_decimal::Decimal,
    campaign_price: rust_decimal::Decimal,
    stock_quantity: Option<i64>,
    target_quantity: Option<i64>,
    sold_quantity: Option<i64>,
    estimated_delivery_days: Option<i32>,
    images: String,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let status: ProductStatus = self
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("product {}: {e}", self.id)))?;

        let images: Vec<ProductImage> = serde_json::from_str(&self.images).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: invalid image list: {e}", self.id))
        })?;

        Ok(Product {
            id: ProductId::new(self.id),
            campaign_id: CampaignId::new(self.campaign_id),
            name: self.name,
            description: self.description,
            status,
            original_price: self.original_price,
            campaign_price: self.campaign_price,
            inventory: Inventory::from_columns(
                self.stock_quantity,
                self.target_quantity,
                self.sold_quantity,
            ),
            estimated_delivery_days: self.estimated_delivery_days,
            images,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CampaignRow {
    id: i32,
    brand_id: i32,
    name: String,
    status: String,
}

impl CampaignRow {
    fn into_campaign(self) -> Result<Campaign, RepositoryError> {
        let status: CampaignStatus = self
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("campaign {}: {e}", self.id)))?;

        Ok(Campaign {
            id: CampaignId::new(self.id),
            brand_id: BrandId::new(self.brand_id),
            name: self.name,
            status,
        })
    }
}

const PRODUCT_QUERY: &str = "SELECT id, campaign_id, name, description, status, \
     original_price, campaign_price, \
     stock_quantity, target_quantity, sold_quantity, \
     estimated_delivery_days, images::TEXT AS images \
     FROM product WHERE id = $1";

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a product on its own, without campaign context.
    ///
    /// Used by the cart view, which still renders lines whose campaign has
    /// since closed. Returns `None` if the product row is gone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row does not decode.
    pub async fn get_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(PRODUCT_QUERY)
            .bind(product_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Fetch a campaign by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row does not decode.
    pub async fn get_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, RepositoryError> {
        let row = sqlx::query_as::<_, CampaignRow>(
            "SELECT id, brand_id, name, status FROM campaign WHERE id = $1",
        )
        .bind(campaign_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(CampaignRow::into_campaign).transpose()
    }

    /// Fetch a product together with its owning campaign.
    ///
    /// Returns `None` when either the product or the campaign is missing;
    /// callers map that to a not-found outcome, distinct from the
    /// not-purchasable outcome [`CatalogEntry::purchasable`] decides.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a row does not decode.
    pub async fn get_entry(
        &self,
        product_id: ProductId,
    ) -> Result<Option<CatalogEntry>, RepositoryError> {
        let Some(product) = self.get_product(product_id).await? else {
            return Ok(None);
        };

        let Some(campaign) = self.get_campaign(product.campaign_id).await? else {
            return Ok(None);
        };

        Ok(Some(CatalogEntry { product, campaign }))
    }

    /// Atomically consume `quantity` units of a product's stock.
    ///
    /// A single conditional `UPDATE` handles both inventory forms: the
    /// counter form decrements `stock_quantity` only if the result stays
    /// non-negative, the target/sold form increments `sold_quantity` only
    /// if the result stays within `target_quantity`. The predicate and the
    /// write happen in one statement, so concurrent checkouts cannot
    /// oversell.
    ///
    /// Returns `false` when the condition did not hold (stock moved since
    /// the caller's read); the caller decides whether to re-read and retry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn apply_sale(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE product SET \
                stock_quantity = CASE \
                    WHEN stock_quantity IS NOT NULL THEN stock_quantity - $2 \
                    ELSE stock_quantity \
                END, \
                sold_quantity = CASE \
                    WHEN stock_quantity IS NULL THEN COALESCE(sold_quantity, 0) + $2 \
                    ELSE sold_quantity \
                END, \
                updated_at = now() \
             WHERE id = $1 \
                AND ( \
                    (stock_quantity IS NOT NULL AND stock_quantity >= $2) \
                    OR (stock_quantity IS NULL \
                        AND COALESCE(sold_quantity, 0) + $2 <= COALESCE(target_quantity, 0)) \
                )",
        )
        .bind(product_id.as_i32())
        .bind(i64::from(quantity))
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
