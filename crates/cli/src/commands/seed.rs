//! Seed the catalog with demo data for local development.
//!
//! Inserts one brand, one active campaign, and a few products covering both
//! inventory accounting forms, so the purchase path can be exercised end to
//! end without the campaign management services.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

/// Errors from seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    original_price: Decimal,
    campaign_price: Decimal,
    // (stock, target, sold): counter form sets stock, target/sold form the rest
    stock_quantity: Option<i64>,
    target_quantity: Option<i64>,
    sold_quantity: Option<i64>,
    estimated_delivery_days: Option<i32>,
    image_url: &'static str,
}

fn demo_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Ceramic travel mug",
            description: "Double-walled 350ml mug in campaign colors.",
            original_price: Decimal::new(2500, 2),
            campaign_price: Decimal::new(1999, 2),
            stock_quantity: Some(120),
            target_quantity: None,
            sold_quantity: None,
            estimated_delivery_days: Some(4),
            image_url: "https://cdn.clementine.shop/demo/mug.jpg",
        },
        SeedProduct {
            name: "Limited tote bag",
            description: "Organic cotton tote, campaign run of 50.",
            original_price: Decimal::new(1800, 2),
            campaign_price: Decimal::new(1500, 2),
            stock_quantity: None,
            target_quantity: Some(50),
            sold_quantity: Some(0),
            estimated_delivery_days: Some(7),
            image_url: "https://cdn.clementine.shop/demo/tote.jpg",
        },
        SeedProduct {
            name: "Sticker sheet",
            description: "A5 sheet of die-cut stickers.",
            original_price: Decimal::new(600, 2),
            campaign_price: Decimal::new(450, 2),
            stock_quantity: Some(500),
            target_quantity: None,
            sold_quantity: None,
            estimated_delivery_days: None,
            image_url: "https://cdn.clementine.shop/demo/stickers.jpg",
        },
    ]
}

/// Seed the storefront catalog.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing or any insert fails.
pub async fn catalog() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .map_err(|_| SeedError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    info!("Connecting to storefront database...");
    let pool = PgPool::connect(&database_url).await?;

    let brand_id: i32 =
        sqlx::query_scalar("INSERT INTO brand (name) VALUES ($1) RETURNING id")
            .bind("Clementine Demo Brand")
            .fetch_one(&pool)
            .await?;

    let campaign_id: i32 = sqlx::query_scalar(
        "INSERT INTO campaign (brand_id, name, status) VALUES ($1, $2, 'active') RETURNING id",
    )
    .bind(brand_id)
    .bind("Summer launch")
    .fetch_one(&pool)
    .await?;

    for product in demo_products() {
        let images = serde_json::json!([
            { "url": product.image_url, "is_primary": true }
        ]);

        sqlx::query(
            "INSERT INTO product \
                (campaign_id, name, description, status, original_price, campaign_price, \
                 stock_quantity, target_quantity, sold_quantity, estimated_delivery_days, images) \
             VALUES ($1, $2, $3, 'active', $4, $5, $6, $7, $8, $9, $10::jsonb)",
        )
        .bind(campaign_id)
        .bind(product.name)
        .bind(product.description)
        .bind(product.original_price)
        .bind(product.campaign_price)
        .bind(product.stock_quantity)
        .bind(product.target_quantity)
        .bind(product.sold_quantity)
        .bind(product.estimated_delivery_days)
        .bind(images.to_string())
        .execute(&pool)
        .await?;

        info!(product = product.name, "Seeded product");
    }

    info!(campaign_id, "Catalog seeded");
    Ok(())
}
