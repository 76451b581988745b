//! Session-related types.
//!
//! Types stored in the session: the signed-in identity and the cart record.

use serde::{Deserialize, Serialize};

/// Session-stored user identity.
///
/// Minimal data identifying the signed-in customer. Populated by the auth
/// boundary; checkout only requires its presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Customer's account ID.
    pub id: i64,
    /// Customer's email address.
    pub email: String,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the serialized cart record (lines + coupon, one record).
    pub const CART: &str = "cart";
}
