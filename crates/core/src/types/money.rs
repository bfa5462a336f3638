//! Deterministic money rounding.
//!
//! Every derived price in the purchase path (line totals, subtotal,
//! shipping, grand total) goes through [`round3`] before it is compared,
//! summed further, or persisted. `rust_decimal` arithmetic is exact, so the
//! only policy encoded here is the scale (3 fractional digits) and the
//! tie-breaking rule (half-up, away from zero).

use rust_decimal::{Decimal, RoundingStrategy};

/// Flat shipping rate applied to the cart subtotal.
///
/// Fixed policy constant; not configurable per product or campaign.
#[must_use]
pub fn shipping_rate() -> Decimal {
    Decimal::new(5, 2) // 0.05
}

/// Round a monetary amount to exactly 3 decimal places, half-up.
#[must_use]
pub fn round3(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounded total for one cart line.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    round3(unit_price * Decimal::from(quantity))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_round3_half_up() {
        assert_eq!(round3(dec("2.0005")), dec("2.001"));
        assert_eq!(round3(dec("2.0004")), dec("2.000"));
        assert_eq!(round3(dec("1.23449")), dec("1.234"));
        assert_eq!(round3(dec("1.2345")), dec("1.235"));
    }

    #[test]
    fn test_round3_away_from_zero() {
        assert_eq!(round3(dec("-2.0005")), dec("-2.001"));
    }

    #[test]
    fn test_round3_idempotent() {
        for s in ["0", "0.1", "19.999", "2.0005", "123456.78949", "-3.1415"] {
            let once = round3(dec(s));
            assert_eq!(round3(once), once);
        }
    }

    #[test]
    fn test_round3_scale_never_exceeds_three() {
        for s in ["1", "1.5", "1.23456789", "0.0004999"] {
            assert!(round3(dec(s)).scale() <= 3);
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(dec("19.99"), 3), dec("59.970"));
        assert_eq!(line_total(dec("0.3335"), 1), dec("0.334"));
        assert_eq!(line_total(dec("100"), 0), dec("0"));
    }

    #[test]
    fn test_shipping_rate_is_five_percent() {
        assert_eq!(shipping_rate(), dec("0.05"));
    }
}
