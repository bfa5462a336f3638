//! Checkout orchestration.
//!
//! A checkout has two phases with an asymmetric failure contract:
//!
//! 1. **Plan** ([`plan`]): pure validation and pricing over a snapshot of
//!    the catalog. Every line is re-checked for purchasability and stock,
//!    and the totals are computed. Any failure here aborts the whole
//!    checkout with zero side effects.
//! 2. **Write** ([`CheckoutService::checkout`]): per-line conditional
//!    inventory updates, the ledger upsert, and the cart clear. The writes
//!    are sequential and independent; there is no cross-document
//!    transaction. A store failure mid-sequence leaves earlier lines'
//!    inventory consumed — callers are told the checkout failed, but prior
//!    decrements are not undone.
//!
//! The per-product conditional update closes the oversell race: if stock
//! moved between the plan's read and the write, the update affects zero
//! rows, the line is re-read and retried once, and a second miss fails the
//! checkout with the fresh remaining count.

use rust_decimal::Decimal;
use sqlx::PgPool;

use clementine_core::{PaymentId, ProductId, line_total, round3, shipping_rate};

use crate::db::{CatalogEntry, CatalogRepository, CustomerRepository, RepositoryError};
use crate::error::AppError;
use crate::models::{Cart, CartLine, CustomerContact};

/// Promised delivery time when no line carries an estimate.
pub const DEFAULT_DELIVERY_DAYS: i32 = 5;

/// Ways a checkout can fail.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references a product (or campaign) that no longer exists.
    #[error("product {product_id} not found")]
    NotFound { product_id: ProductId },

    /// A cart line's product or campaign is not in `active` status.
    #[error("product {product_id} is not available for purchase")]
    Unavailable { product_id: ProductId },

    /// A cart line asks for more units than are available right now.
    #[error("insufficient stock for product {product_id}: only {remaining} left")]
    InsufficientStock {
        product_id: ProductId,
        remaining: u32,
    },

    /// The underlying store failed. Not retried here; writes already
    /// applied for earlier lines remain applied.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => Self::Validation(err.to_string()),
            CheckoutError::NotFound { .. } => Self::NotFound(err.to_string()),
            CheckoutError::Unavailable { .. } => Self::Unavailable(err.to_string()),
            CheckoutError::InsufficientStock { remaining, .. } => {
                Self::InsufficientStock { remaining }
            }
            CheckoutError::Store(e) => Self::Database(e),
        }
    }
}

/// Priced snapshot of one cart line.
#[derive(Debug, Clone)]
pub struct LineCharge {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Validated, fully priced checkout ready to be written.
#[derive(Debug, Clone)]
pub struct CheckoutPlan {
    pub charges: Vec<LineCharge>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub grand_total: Decimal,
    /// Sum of quantities across all lines.
    pub total_quantity: u32,
    /// Slowest line's delivery estimate, or [`DEFAULT_DELIVERY_DAYS`].
    pub delivery_days: i32,
}

/// Confirmation returned to the customer after a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub payment_id: PaymentId,
    pub amount: Decimal,
    pub delivery_days: i32,
    pub message: String,
}

/// Validate the cart against a catalog snapshot and price it.
///
/// `entries[i]` is the freshly fetched catalog entry for `lines[i]`
/// (`None` when the product or its campaign is gone). All lines are
/// checked before anything is written; the first failing line aborts the
/// whole checkout.
///
/// Stock rule at checkout time: `available_stock >= quantity`. Unlike the
/// cart admission check there is no "reserved" term — this cart's own
/// lines are the thing being purchased.
///
/// # Errors
///
/// Returns the corresponding [`CheckoutError`] for an empty cart, a
/// missing or non-purchasable product, or a stock shortfall.
pub fn plan(
    lines: &[CartLine],
    entries: &[Option<CatalogEntry>],
) -> Result<CheckoutPlan, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    debug_assert_eq!(lines.len(), entries.len());

    let mut charges = Vec::with_capacity(lines.len());
    let mut raw_subtotal = Decimal::ZERO;
    let mut total_quantity: u32 = 0;
    let mut delivery_days: Option<i32> = None;

    for (line, entry) in lines.iter().zip(entries) {
        let entry = entry.as_ref().ok_or(CheckoutError::NotFound {
            product_id: line.product_id,
        })?;

        if !entry.purchasable() {
            return Err(CheckoutError::Unavailable {
                product_id: line.product_id,
            });
        }

        let available = entry.product.available_stock();
        if available < line.quantity {
            return Err(CheckoutError::InsufficientStock {
                product_id: line.product_id,
                remaining: available,
            });
        }

        let unit_price = entry.product.campaign_price;
        raw_subtotal += unit_price * Decimal::from(line.quantity);
        total_quantity += line.quantity;

        if let Some(days) = entry.product.estimated_delivery_days {
            delivery_days = Some(delivery_days.map_or(days, |d| d.max(days)));
        }

        charges.push(LineCharge {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price,
            line_total: line_total(unit_price, line.quantity),
        });
    }

    let subtotal = round3(raw_subtotal);
    let shipping = round3(subtotal * shipping_rate());
    let grand_total = round3(subtotal + shipping);

    Ok(CheckoutPlan {
        charges,
        subtotal,
        shipping,
        grand_total,
        total_quantity,
        delivery_days: delivery_days.unwrap_or(DEFAULT_DELIVERY_DAYS),
    })
}

/// Executes checkouts against the live catalog and ledger.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run a full checkout for the session's cart.
    ///
    /// Re-fetches every line's product fresh, plans (see [`plan`]), then
    /// applies the inventory writes, records the purchase on the customer
    /// ledger, and clears the cart. The cart is only mutated on success.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] per the module-level failure contract.
    pub async fn checkout(
        &self,
        cart: &mut Cart,
        contact: &CustomerContact,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let catalog = CatalogRepository::new(self.pool);

        // Read phase: fetch every line before writing anything.
        let mut entries = Vec::with_capacity(cart.lines().len());
        for line in cart.lines() {
            entries.push(catalog.get_entry(line.product_id).await?);
        }
        let plan = plan(cart.lines(), &entries)?;

        // Write phase: per-line conditional updates, sequential and
        // independent. Earlier lines stay consumed if a later one fails.
        for line in cart.lines() {
            self.consume_stock(&catalog, line).await?;
        }

        let payment_id = PaymentId::generate();

        let customers = CustomerRepository::new(self.pool);
        customers
            .record_purchase(contact, plan.total_quantity, plan.grand_total)
            .await?;

        cart.clear();

        tracing::info!(
            payment_id = %payment_id,
            email = %contact.email,
            amount = %plan.grand_total,
            items = plan.total_quantity,
            "checkout completed"
        );

        Ok(CheckoutReceipt {
            payment_id,
            amount: plan.grand_total,
            delivery_days: plan.delivery_days,
            message: format!(
                "Payment received. Your order will be delivered in {} days.",
                plan.delivery_days
            ),
        })
    }

    /// Apply one line's inventory write, retrying once on a lost race.
    async fn consume_stock(
        &self,
        catalog: &CatalogRepository<'_>,
        line: &CartLine,
    ) -> Result<(), CheckoutError> {
        if catalog.apply_sale(line.product_id, line.quantity).await? {
            return Ok(());
        }

        // Stock moved between the plan's read and this write. Re-read and
        // retry once with fresh data before giving up.
        let remaining = match catalog.get_entry(line.product_id).await? {
            Some(entry) if entry.purchasable() => entry.product.available_stock(),
            _ => 0,
        };

        if remaining >= line.quantity
            && catalog.apply_sale(line.product_id, line.quantity).await?
        {
            return Ok(());
        }

        tracing::warn!(
            product_id = %line.product_id,
            requested = line.quantity,
            remaining,
            "stock consumed by a concurrent checkout"
        );

        Err(CheckoutError::InsufficientStock {
            product_id: line.product_id,
            remaining,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clementine_core::{BrandId, CampaignId, CampaignStatus, Inventory, ProductStatus};
    use crate::models::{Campaign, Product};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn entry(id: i32, price: &str, inventory: Inventory) -> CatalogEntry {
        CatalogEntry {
            product: Product {
                id: ProductId::new(id),
                campaign_id: CampaignId::new(1),
                name: format!("Product {id}"),
                description: None,
                status: ProductStatus::Active,
                original_price: dec(price),
                campaign_price: dec(price),
                inventory,
                estimated_delivery_days: None,
                images: Vec::new(),
            },
            campaign: Campaign {
                id: CampaignId::new(1),
                brand_id: BrandId::new(1),
                name: "Summer launch".to_string(),
                status: CampaignStatus::Active,
            },
        }
    }

    fn line(id: i32, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_is_a_validation_error() {
        let err = plan(&[], &[]).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_plan_target_sold_success() {
        // target 10, sold 8, price 100, quantity 2
        let entry = entry(1, "100", Inventory::TargetSold { target: 10, sold: 8 });
        let plan = plan(&[line(1, 2)], &[Some(entry)]).unwrap();

        assert_eq!(plan.subtotal, dec("200.000"));
        assert_eq!(plan.shipping, dec("10.000"));
        assert_eq!(plan.grand_total, dec("210.000"));
        assert_eq!(plan.total_quantity, 2);
        assert_eq!(plan.delivery_days, DEFAULT_DELIVERY_DAYS);
    }

    #[test]
    fn test_plan_insufficient_stock_reports_remaining() {
        // target 10, sold 8 -> available 2; quantity 3 must fail
        let entry = entry(1, "100", Inventory::TargetSold { target: 10, sold: 8 });
        let err = plan(&[line(1, 3)], &[Some(entry)]).unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { remaining: 2, .. }
        ));
    }

    #[test]
    fn test_plan_rejects_closed_campaign() {
        let mut entry = entry(1, "50", Inventory::Counter { stock: 5 });
        entry.campaign.status = CampaignStatus::Completed;

        let err = plan(&[line(1, 1)], &[Some(entry)]).unwrap_err();
        assert!(matches!(err, CheckoutError::Unavailable { .. }));
    }

    #[test]
    fn test_plan_rejects_inactive_product() {
        let mut entry = entry(1, "50", Inventory::Counter { stock: 5 });
        entry.product.status = ProductStatus::Inactive;

        let err = plan(&[line(1, 1)], &[Some(entry)]).unwrap_err();
        assert!(matches!(err, CheckoutError::Unavailable { .. }));
    }

    #[test]
    fn test_plan_missing_product_is_not_found() {
        let err = plan(&[line(1, 1)], &[None]).unwrap_err();
        assert!(matches!(err, CheckoutError::NotFound { .. }));
    }

    #[test]
    fn test_plan_first_failing_line_aborts_everything() {
        let ok = entry(1, "10", Inventory::Counter { stock: 5 });
        let short = entry(2, "10", Inventory::Counter { stock: 1 });

        let err = plan(
            &[line(1, 2), line(2, 2)],
            &[Some(ok), Some(short)],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { remaining: 1, .. }
        ));
    }

    #[test]
    fn test_plan_delivery_days_is_slowest_line() {
        let mut fast = entry(1, "10", Inventory::Counter { stock: 5 });
        fast.product.estimated_delivery_days = Some(3);
        let mut slow = entry(2, "10", Inventory::Counter { stock: 5 });
        slow.product.estimated_delivery_days = Some(9);

        let plan = plan(
            &[line(1, 1), line(2, 1)],
            &[Some(fast), Some(slow)],
        )
        .unwrap();

        assert_eq!(plan.delivery_days, 9);
    }

    #[test]
    fn test_plan_totals_round_to_three_decimals() {
        // 3 x 0.3335 = 1.0005 -> subtotal 1.001 (half-up)
        let entry = entry(1, "0.3335", Inventory::Counter { stock: 10 });
        let plan = plan(&[line(1, 3)], &[Some(entry)]).unwrap();

        assert_eq!(plan.subtotal, dec("1.001"));
        // shipping = round3(1.001 * 0.05) = round3(0.05005) = 0.050 (0.05005 -> 0.050)
        assert_eq!(plan.shipping, dec("0.050"));
        assert_eq!(plan.grand_total, dec("1.051"));
    }

    #[test]
    fn test_sequential_checkouts_for_last_unit() {
        // availableStock = 1; two buyers take 1 unit each, serialized.
        let first = entry(1, "25", Inventory::TargetSold { target: 10, sold: 9 });

        let first_plan = plan(&[line(1, 1)], &[Some(first.clone())]).unwrap();
        assert_eq!(first_plan.total_quantity, 1);

        // The first checkout's write moves sold to 10; the second buyer's
        // fresh read sees no stock left.
        let mut second = first;
        second.product.inventory = Inventory::TargetSold { target: 10, sold: 10 };

        let err = plan(&[line(1, 1)], &[Some(second)]).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { remaining: 0, .. }
        ));
    }

    #[test]
    fn test_checkout_error_maps_to_app_error() {
        let err: AppError = CheckoutError::InsufficientStock {
            product_id: ProductId::new(1),
            remaining: 2,
        }
        .into();
        assert!(matches!(err, AppError::InsufficientStock { remaining: 2 }));

        let err: AppError = CheckoutError::EmptyCart.into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
