//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `clem_storefront`
//!
//! ## Tables
//!
//! - `campaign` - Brand campaigns (read-only to this service)
//! - `product` - Campaign products; stock fields are the only columns this
//!   service mutates
//! - `customer` - Denormalized per-customer lifetime purchase ledger
//! - `session` - Tower-sessions storage (created by the session store on boot)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p clementine-cli -- migrate storefront
//! ```

pub mod catalog;
pub mod customers;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use catalog::{CatalogEntry, CatalogRepository};
pub use customers::CustomerRepository;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
