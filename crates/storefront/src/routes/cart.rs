//! Cart route handlers.
//!
//! The cart lives in the session; every handler loads it, mutates the value
//! type, and writes it back. Concurrent requests within one session are
//! last-write-wins, which matches the session store's own semantics.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use clementine_core::{ProductId, line_total, round3, shipping_rate};

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::models::{Cart, session_keys};
use crate::state::AppState;

/// Display name for a line whose product was deleted after being added.
const PLACEHOLDER_NAME: &str = "Product no longer available";

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to an empty one.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(format!("failed to load session cart: {e}")))?
        .unwrap_or_default())
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save session cart: {e}")))
}

// =============================================================================
// Request / Response types
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Defaults to 1; non-positive values are clamped to 1.
    pub quantity: Option<u32>,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Response carrying the new total item count.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub cart_count: u32,
}

/// One priced line in the cart view.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Priced cart view.
#[derive(Debug, Serialize)]
pub struct CartViewResponse {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Priced cart view.
///
/// Lines whose product has been deleted since they were added still render,
/// with a placeholder name and a zero price; they will fail checkout's
/// re-validation instead.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartViewResponse>> {
    let cart = load_cart(&session).await?;
    let catalog = CatalogRepository::new(state.pool());

    let mut items = Vec::with_capacity(cart.lines().len());
    let mut running_subtotal = Decimal::ZERO;

    for line in cart.lines() {
        let product = catalog.get_product(line.product_id).await?;

        let (name, image, unit_price) = match &product {
            Some(p) => (
                p.name.clone(),
                p.primary_image().map(|image| image.url.clone()),
                p.campaign_price,
            ),
            None => (PLACEHOLDER_NAME.to_string(), None, Decimal::ZERO),
        };

        let total = line_total(unit_price, line.quantity);
        running_subtotal += total;

        items.push(CartItemView {
            product_id: line.product_id,
            name,
            image,
            unit_price,
            quantity: line.quantity,
            line_total: total,
        });
    }

    let subtotal = round3(running_subtotal);
    let shipping = round3(subtotal * shipping_rate());
    let total = round3(subtotal + shipping);

    Ok(Json(CartViewResponse {
        items,
        subtotal,
        shipping,
        total,
        item_count: cart.total_quantity(),
    }))
}

/// Add item to cart.
///
/// Runs the advisory admission check against current availability and this
/// session's existing reservation. A rejection returns 409 with the exact
/// remaining count; the cart is left unchanged.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<CartCountResponse>> {
    let catalog = CatalogRepository::new(state.pool());

    let entry = catalog
        .get_entry(req.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {} not found", req.product_id)))?;

    if !entry.purchasable() {
        return Err(AppError::Unavailable(format!(
            "product {} is not available for purchase",
            req.product_id
        )));
    }

    let mut cart = load_cart(&session).await?;

    let cart_count = cart
        .add(
            req.product_id,
            req.quantity.unwrap_or(1),
            entry.product.available_stock(),
        )
        .map_err(|shortage| AppError::InsufficientStock {
            remaining: shortage.remaining,
        })?;

    save_cart(&session, &cart).await?;

    Ok(Json(CartCountResponse { cart_count }))
}

/// Remove item from cart. Absence is not an error.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(req): Json<RemoveFromCartRequest>,
) -> Result<Json<CartCountResponse>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(req.product_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartCountResponse {
        cart_count: cart.total_quantity(),
    }))
}

/// Cart item count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCountResponse>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCountResponse {
        cart_count: cart.total_quantity(),
    }))
}
