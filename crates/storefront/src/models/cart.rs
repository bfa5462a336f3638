//! Session-scoped shopping cart.
//!
//! The cart is a small value type stored in the customer's session under
//! [`session::keys::CART`](super::session::keys::CART). It is deliberately
//! non-durable: session expiry or a restart of the session store discards
//! it. Product ids are unique within the line list and every quantity is at
//! least 1.
//!
//! The admission check here is advisory. Two sessions can both pass it for
//! the last unit of a product; checkout re-validates against live stock and
//! only one of them will succeed.

use serde::{Deserialize, Serialize};

use clementine_core::ProductId;

/// One `(product, quantity)` pair inside a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Rejection from the cart admission check.
///
/// Carries the quantity still admittable so the client can offer a
/// corrected amount ("only N left").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockShortage {
    pub remaining: u32,
}

/// Ordered collection of cart lines for one customer session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total item count across all lines (sum of quantities).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Quantity of `product_id` already reserved by this cart (0 if absent).
    #[must_use]
    pub fn reserved(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }

    /// Try to add `requested` more units of `product_id`.
    ///
    /// Non-positive input is clamped to 1 before the check. Admission rule:
    /// `requested <= max(0, available - reserved)`. On admission the
    /// existing line is incremented (or a new line appended) and the new
    /// total item count is returned; on rejection the cart is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StockShortage`] with the exact remaining count when the
    /// requested quantity cannot be admitted.
    pub fn add(
        &mut self,
        product_id: ProductId,
        requested: u32,
        available: u32,
    ) -> Result<u32, StockShortage> {
        let requested = requested.max(1);
        let remaining = available.saturating_sub(self.reserved(product_id));

        if requested > remaining {
            return Err(StockShortage { remaining });
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            Some(line) => line.quantity += requested,
            None => self.lines.push(CartLine {
                product_id,
                quantity: requested,
            }),
        }

        Ok(self.total_quantity())
    }

    /// Remove the line for `product_id`. Absence is a no-op.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Empty the cart (on successful checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MUG: ProductId = ProductId::new(1);
    const TEE: ProductId = ProductId::new(2);

    #[test]
    fn test_add_appends_then_accumulates() {
        let mut cart = Cart::default();
        assert_eq!(cart.add(MUG, 2, 10).unwrap(), 2);
        assert_eq!(cart.add(MUG, 3, 10).unwrap(), 5);

        // One line with quantity 5, not two lines
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.reserved(MUG), 5);
    }

    #[test]
    fn test_add_preserves_line_order() {
        let mut cart = Cart::default();
        cart.add(MUG, 1, 10).unwrap();
        cart.add(TEE, 1, 10).unwrap();
        cart.add(MUG, 1, 10).unwrap();

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![MUG, TEE]);
    }

    #[test]
    fn test_add_rejected_reports_remaining() {
        let mut cart = Cart::default();
        cart.add(MUG, 2, 3).unwrap();

        // available=3, reserved=2 -> remaining=1
        let err = cart.add(MUG, 2, 3).unwrap_err();
        assert_eq!(err.remaining, 1);

        // Cart unchanged on rejection
        assert_eq!(cart.reserved(MUG), 2);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_add_rejected_when_out_of_stock() {
        let mut cart = Cart::default();
        let err = cart.add(MUG, 1, 0).unwrap_err();
        assert_eq!(err.remaining, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_clamps_zero_quantity_to_one() {
        let mut cart = Cart::default();
        assert_eq!(cart.add(MUG, 0, 5).unwrap(), 1);
        assert_eq!(cart.reserved(MUG), 1);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut cart = Cart::default();
        cart.add(MUG, 2, 5).unwrap();
        cart.remove(TEE);
        assert_eq!(cart.total_quantity(), 2);

        cart.remove(MUG);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_quantity_sums_lines() {
        let mut cart = Cart::default();
        cart.add(MUG, 2, 10).unwrap();
        cart.add(TEE, 3, 10).unwrap();
        assert_eq!(cart.total_quantity(), 5);
    }
}
