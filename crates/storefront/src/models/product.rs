//! Campaign product model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clementine_core::{CampaignId, Inventory, ProductId, ProductStatus};

/// One image attached to a product.
///
/// At most one image should be flagged primary; if none is, the first image
/// in the list is treated as primary for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Public URL of the image.
    pub url: String,
    /// Whether this image is the product's primary image.
    #[serde(default)]
    pub is_primary: bool,
}

/// A product offered under a campaign.
///
/// Pricing and catalog fields are read-only to this service; only the
/// inventory columns are mutated, and only through
/// [`CatalogRepository::apply_sale`](crate::db::CatalogRepository::apply_sale).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub campaign_id: CampaignId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProductStatus,
    /// List price before the campaign discount.
    pub original_price: Decimal,
    /// Price customers actually pay while the campaign runs.
    pub campaign_price: Decimal,
    pub inventory: Inventory,
    /// Promised delivery time in days, if the brand provided one.
    pub estimated_delivery_days: Option<i32>,
    /// Ordered image list.
    pub images: Vec<ProductImage>,
}

impl Product {
    /// Units purchasable right now. Never negative.
    #[must_use]
    pub fn available_stock(&self) -> u32 {
        self.inventory.available()
    }

    /// The image to display: first flagged primary, else the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_images(images: Vec<ProductImage>) -> Product {
        Product {
            id: ProductId::new(1),
            campaign_id: CampaignId::new(1),
            name: "Ceramic mug".to_string(),
            description: None,
            status: ProductStatus::Active,
            original_price: Decimal::new(2500, 2),
            campaign_price: Decimal::new(1999, 2),
            inventory: Inventory::Counter { stock: 10 },
            estimated_delivery_days: None,
            images,
        }
    }

    #[test]
    fn test_primary_image_flagged() {
        let product = product_with_images(vec![
            ProductImage {
                url: "a.jpg".to_string(),
                is_primary: false,
            },
            ProductImage {
                url: "b.jpg".to_string(),
                is_primary: true,
            },
        ]);
        assert_eq!(product.primary_image().map(|i| i.url.as_str()), Some("b.jpg"));
    }

    #[test]
    fn test_primary_image_falls_back_to_first() {
        let product = product_with_images(vec![
            ProductImage {
                url: "a.jpg".to_string(),
                is_primary: false,
            },
            ProductImage {
                url: "b.jpg".to_string(),
                is_primary: false,
            },
        ]);
        assert_eq!(product.primary_image().map(|i| i.url.as_str()), Some("a.jpg"));
    }

    #[test]
    fn test_primary_image_none() {
        let product = product_with_images(Vec::new());
        assert!(product.primary_image().is_none());
    }
}
