//! Coupon types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named discount rule applied to a cart's subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Code customers type at checkout. Stored uppercase; lookup is
    /// case-insensitive.
    pub code: String,
    /// Discount as a whole percentage of the subtotal (0-100).
    pub percentage: u8,
    /// Minimum order subtotal required to redeem.
    pub minimum_order: Decimal,
    /// Redemption cap carried from the discount configuration. There is no
    /// per-code counter, so this is informational only; see
    /// [`crate::coupon::CouponBook::validate`].
    pub max_redemptions: u32,
}

/// The coupon currently applied to a cart.
///
/// Modeled as a single optional value on the cart so a nonzero discount can
/// never exist without its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// The redeemed code, uppercase.
    pub code: String,
    /// Discount percentage granted for it.
    pub percentage: u8,
}

/// Successful validation result: the discount a code grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CouponGrant {
    /// Discount as a whole percentage of the subtotal (0-100).
    pub percentage: u8,
}
