//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use clementine_core::{CampaignId, ProductId};

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Normalized product view returned to clients.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub id: ProductId,
    pub campaign_id: CampaignId,
    pub name: String,
    pub description: Option<String>,
    /// Price customers pay while the campaign runs.
    pub price: Decimal,
    pub original_price: Decimal,
    /// Primary image URL, if the product has any images.
    pub image: Option<String>,
    pub available_stock: u32,
    pub estimated_delivery_days: Option<i32>,
}

impl From<&Product> for ProductDetailResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            campaign_id: product.campaign_id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.campaign_price,
            original_price: product.original_price,
            image: product.primary_image().map(|image| image.url.clone()),
            available_stock: product.available_stock(),
            estimated_delivery_days: product.estimated_delivery_days,
        }
    }
}

/// Product detail.
///
/// Distinguishes an unknown product (404) from one that exists but is not
/// open for purchase (403) because its own status or its campaign's status
/// is not active.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetailResponse>> {
    let catalog = CatalogRepository::new(state.pool());

    let entry = catalog
        .get_entry(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;

    if !entry.purchasable() {
        return Err(AppError::Unavailable(format!(
            "product {id} is not available for purchase"
        )));
    }

    Ok(Json(ProductDetailResponse::from(&entry.product)))
}
