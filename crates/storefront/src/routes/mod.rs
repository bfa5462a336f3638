//! HTTP route handlers for storefront.
//!
//! The purchase operations are exposed as a small JSON API; amounts are
//! serialized as decimal strings.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Products
//! GET  /products/{id}          - Product detail (404 unknown, 403 not purchasable)
//!
//! # Cart
//! GET  /cart                   - Priced cart view
//! POST /cart/add               - Add item (409 with remaining count on shortage)
//! POST /cart/remove            - Remove item (no-op if absent)
//! GET  /cart/count             - Cart item count
//!
//! # Checkout
//! POST /checkout               - Validate, charge (simulated), mutate stock
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::checkout))
}
