//! Derived order totals.
//!
//! Totals are a pure function of the cart's lines and applied discount; they
//! are recomputed on demand and never stored. All arithmetic is exact
//! decimal arithmetic via `rust_decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax rate applied to the post-discount subtotal (9%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(9, 2)
}

/// Shipping cost. Unconditionally free; kept as an explicit constant rather
/// than a conditional rule.
#[must_use]
pub fn shipping_cost() -> Decimal {
    Decimal::ZERO
}

/// The derived money breakdown for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of `unit_price * quantity` over all lines.
    pub subtotal: Decimal,
    /// `subtotal * discount_percentage / 100`.
    pub discount_amount: Decimal,
    /// `subtotal - discount_amount`.
    pub discounted_subtotal: Decimal,
    /// `discounted_subtotal * tax_rate`.
    pub tax_amount: Decimal,
    /// Always zero; see [`shipping_cost`].
    pub shipping: Decimal,
    /// `discounted_subtotal + tax_amount + shipping` - the charge amount.
    pub grand_total: Decimal,
}

impl OrderTotals {
    /// Compute the full breakdown from a subtotal and discount percentage.
    #[must_use]
    pub fn compute(subtotal: Decimal, discount_percentage: u8) -> Self {
        let discount_amount =
            subtotal * Decimal::from(discount_percentage) / Decimal::ONE_HUNDRED;
        let discounted_subtotal = subtotal - discount_amount;
        let tax_amount = discounted_subtotal * tax_rate();
        let shipping = shipping_cost();
        let grand_total = discounted_subtotal + tax_amount + shipping;

        Self {
            subtotal,
            discount_amount,
            discounted_subtotal,
            tax_amount,
            shipping,
            grand_total,
        }
    }

    /// Totals of an empty cart.
    #[must_use]
    pub fn zero() -> Self {
        Self::compute(Decimal::ZERO, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_without_discount() {
        let totals = OrderTotals::compute(Decimal::new(40, 0), 0);
        assert_eq!(totals.subtotal, Decimal::new(40, 0));
        assert_eq!(totals.discount_amount, Decimal::ZERO);
        assert_eq!(totals.discounted_subtotal, Decimal::new(40, 0));
        assert_eq!(totals.tax_amount, Decimal::new(360, 2));
        assert_eq!(totals.grand_total, Decimal::new(4360, 2));
    }

    #[test]
    fn test_totals_with_ten_percent_discount() {
        // $40 with WELCOME10: discount $4, taxed base $36, tax $3.24
        let totals = OrderTotals::compute(Decimal::new(40, 0), 10);
        assert_eq!(totals.discount_amount, Decimal::new(4, 0));
        assert_eq!(totals.discounted_subtotal, Decimal::new(36, 0));
        assert_eq!(totals.tax_amount, Decimal::new(324, 2));
        assert_eq!(totals.grand_total, Decimal::new(3924, 2));
    }

    #[test]
    fn test_grand_total_is_discounted_subtotal_times_one_point_oh_nine() {
        let totals = OrderTotals::compute(Decimal::new(12345, 2), 25);
        let factor = Decimal::ONE + tax_rate();
        assert_eq!(totals.grand_total, totals.discounted_subtotal * factor);
        assert!(totals.grand_total >= totals.discounted_subtotal);
    }

    #[test]
    fn test_shipping_is_always_free() {
        assert_eq!(OrderTotals::compute(Decimal::new(9999, 2), 50).shipping, Decimal::ZERO);
        assert_eq!(OrderTotals::zero().shipping, Decimal::ZERO);
    }

    #[test]
    fn test_zero_totals() {
        let totals = OrderTotals::zero();
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::ZERO);
    }
}
