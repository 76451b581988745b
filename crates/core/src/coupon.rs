//! Coupon validation against a fixed table.
//!
//! The table is in-process configuration, not a persisted entity: there is
//! no redemption counter, so `max_redemptions` on each entry is carried but
//! never decremented. Validation is pure - the same code and subtotal always
//! produce the same answer.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Coupon, CouponGrant};

/// Why a coupon code was refused.
///
/// Rejections are recoverable user-facing outcomes, not failures: the cart
/// is left unchanged and the message is shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponRejection {
    /// The code has no entry in the table.
    #[error("coupon code not recognized")]
    NotFound,

    /// The order subtotal is below the coupon's minimum.
    #[error("order must be at least ${minimum} to use this coupon")]
    MinimumNotMet {
        /// The minimum subtotal the coupon requires, for display.
        minimum: Decimal,
    },
}

/// The fixed coupon table.
#[derive(Debug, Clone)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    /// Build a table from explicit entries. Codes are normalized to
    /// uppercase on the way in so lookup stays case-insensitive.
    #[must_use]
    pub fn new(coupons: Vec<Coupon>) -> Self {
        let coupons = coupons
            .into_iter()
            .map(|mut coupon| {
                coupon.code = coupon.code.trim().to_uppercase();
                coupon
            })
            .collect();
        Self { coupons }
    }

    /// The built-in table the storefront ships with.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Coupon {
                code: "WELCOME10".to_string(),
                percentage: 10,
                minimum_order: Decimal::ZERO,
                max_redemptions: 1000,
            },
            Coupon {
                code: "SUMMER15".to_string(),
                percentage: 15,
                minimum_order: Decimal::new(50, 0),
                max_redemptions: 500,
            },
            Coupon {
                code: "VIP25".to_string(),
                percentage: 25,
                minimum_order: Decimal::new(100, 0),
                max_redemptions: 100,
            },
        ])
    }

    /// Look up a code without validating the subtotal.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Coupon> {
        let normalized = code.trim().to_uppercase();
        self.coupons.iter().find(|coupon| coupon.code == normalized)
    }

    /// Iterate over all entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter()
    }

    /// Validate a code against an order subtotal.
    ///
    /// Lookup is case-insensitive. On success returns the discount the code
    /// grants; nothing is mutated and no redemption is recorded.
    ///
    /// # Errors
    ///
    /// [`CouponRejection::NotFound`] when the code has no entry,
    /// [`CouponRejection::MinimumNotMet`] when the subtotal is below the
    /// coupon's minimum (carrying that minimum for display).
    pub fn validate(&self, code: &str, subtotal: Decimal) -> Result<CouponGrant, CouponRejection> {
        let coupon = self.get(code).ok_or(CouponRejection::NotFound)?;

        if subtotal < coupon.minimum_order {
            return Err(CouponRejection::MinimumNotMet {
                minimum: coupon.minimum_order,
            });
        }

        Ok(CouponGrant {
            percentage: coupon.percentage,
        })
    }
}

impl Default for CouponBook {
    fn default() -> Self {
        Self::builtin()
    }
}
