//! Inventory accounting for products.
//!
//! Products carry one of two inventory representations, depending on the
//! schema generation they were created under: a direct stock counter, or a
//! campaign sales target paired with a running sold count. Rather than
//! scattering presence checks through the purchase path, the two forms are a
//! tagged variant with one `available()` implementation per form.

use serde::{Deserialize, Serialize};

/// The two inventory accounting forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum Inventory {
    /// Direct counter, decremented on purchase.
    Counter {
        /// Units remaining.
        stock: i64,
    },
    /// Campaign sales target; sold count is incremented on purchase.
    TargetSold {
        /// Total units offered by the campaign.
        target: i64,
        /// Units sold so far.
        sold: i64,
    },
}

impl Inventory {
    /// Build from the nullable database columns.
    ///
    /// A non-null `stock_quantity` selects the counter form; otherwise the
    /// target/sold pair applies, with absent columns treated as zero.
    #[must_use]
    pub fn from_columns(
        stock_quantity: Option<i64>,
        target_quantity: Option<i64>,
        sold_quantity: Option<i64>,
    ) -> Self {
        match stock_quantity {
            Some(stock) => Self::Counter { stock },
            None => Self::TargetSold {
                target: target_quantity.unwrap_or(0),
                sold: sold_quantity.unwrap_or(0),
            },
        }
    }

    /// Units purchasable right now. Never negative, even from corrupt
    /// counts (`sold > target`, negative stock).
    #[must_use]
    pub fn available(&self) -> u32 {
        let raw = match *self {
            Self::Counter { stock } => stock,
            Self::TargetSold { target, sold } => target - sold,
        };
        u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_available() {
        assert_eq!(Inventory::Counter { stock: 12 }.available(), 12);
        assert_eq!(Inventory::Counter { stock: 0 }.available(), 0);
        assert_eq!(Inventory::Counter { stock: -4 }.available(), 0);
    }

    #[test]
    fn test_target_sold_available() {
        assert_eq!(
            Inventory::TargetSold {
                target: 10,
                sold: 3
            }
            .available(),
            7
        );
        assert_eq!(
            Inventory::TargetSold { target: 5, sold: 5 }.available(),
            0
        );
    }

    #[test]
    fn test_oversold_never_negative() {
        assert_eq!(
            Inventory::TargetSold { target: 5, sold: 9 }.available(),
            0
        );
    }

    #[test]
    fn test_from_columns_prefers_counter() {
        assert_eq!(
            Inventory::from_columns(Some(3), Some(10), Some(2)),
            Inventory::Counter { stock: 3 }
        );
        assert_eq!(
            Inventory::from_columns(None, Some(10), Some(2)),
            Inventory::TargetSold {
                target: 10,
                sold: 2
            }
        );
        assert_eq!(
            Inventory::from_columns(None, None, None),
            Inventory::TargetSold { target: 0, sold: 0 }
        );
    }
}
