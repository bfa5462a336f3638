//! Checkout route handler.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::CustomerContact;
use crate::services::CheckoutService;
use crate::state::AppState;

use super::cart::{load_cart, save_cart};

/// Checkout request body: minimal customer contact info.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Checkout confirmation.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub payment_id: String,
    pub amount: Decimal,
    pub delivery_days: i32,
    pub message: String,
}

/// Run a checkout for the session's cart.
///
/// Validation and availability failures happen before any write (400, 403,
/// 404, 409 with remaining count). A store failure during the write phase
/// returns 500; inventory already consumed for earlier lines stays consumed.
#[instrument(skip(state, session, req))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let contact = CustomerContact::parse(&req.name, &req.email, req.phone.as_deref())
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut cart = load_cart(&session).await?;

    let receipt = CheckoutService::new(state.pool())
        .checkout(&mut cart, &contact)
        .await?;

    // The service cleared the cart; persist that.
    save_cart(&session, &cart).await?;

    Ok(Json(CheckoutResponse {
        payment_id: receipt.payment_id.into_inner(),
        amount: receipt.amount,
        delivery_days: receipt.delivery_days,
        message: receipt.message,
    }))
}
