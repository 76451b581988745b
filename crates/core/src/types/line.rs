//! Cart line types.
//!
//! A line is one distinct product+size+color combination and its quantity.
//! Two lines with the same product but different size or color are distinct
//! entries in the cart.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Composite identity of a cart line.
///
/// Lines are keyed by (product, size, color); quantity changes address an
/// existing key, never create a second line for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    /// Product identifier.
    pub product_id: String,
    /// Selected size (e.g., "M").
    pub size: String,
    /// Selected color (e.g., "Negro").
    pub color: String,
}

impl LineKey {
    /// Create a line key.
    #[must_use]
    pub fn new(
        product_id: impl Into<String>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.into(),
            color: color.into(),
        }
    }
}

/// One line of a cart.
///
/// Invariants (enforced by [`crate::cart::CartState`], which owns all lines):
/// - `quantity >= 1` - a line driven to zero is removed, not retained.
/// - `quantity <= stock_ceiling` when a ceiling is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier.
    pub product_id: String,
    /// Product display name.
    pub name: String,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Units of this line in the cart.
    pub quantity: u32,
    /// Selected size.
    pub size: String,
    /// Selected color.
    pub color: String,
    /// Product image URL (display only).
    pub image_url: String,
    /// Maximum quantity permitted, sourced from product stock at the time
    /// the line was created or last updated. `None` means unbounded.
    pub stock_ceiling: Option<u32>,
}

impl CartLine {
    /// The composite identity of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(
            self.product_id.clone(),
            self.size.clone(),
            self.color.clone(),
        )
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Whether this line matches the given key without allocating.
    #[must_use]
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.size == key.size && self.color == key.color
    }
}

/// Input for [`crate::cart::CartState::add_line`].
///
/// The quantity is `NonZeroU32` by construction; a zero-quantity add is not
/// representable. The stock ceiling is the product's available stock at the
/// moment of the add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLine {
    /// Product identifier.
    pub product_id: String,
    /// Product display name.
    pub name: String,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Units to add.
    pub quantity: NonZeroU32,
    /// Selected size.
    pub size: String,
    /// Selected color.
    pub color: String,
    /// Product image URL.
    pub image_url: String,
    /// Available stock, if tracked for this product.
    pub stock_ceiling: Option<u32>,
}

impl NewLine {
    /// The composite identity this add addresses.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(
            self.product_id.clone(),
            self.size.clone(),
            self.color.clone(),
        )
    }
}
