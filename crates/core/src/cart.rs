//! Cart state and line algebra.
//!
//! [`CartState`] is the single source of truth for a customer's cart within
//! a session: an insertion-ordered collection of lines plus an optionally
//! applied coupon. All mutations are synchronous and total - stock
//! violations clamp rather than fail, and removals of absent lines are
//! no-ops - so a sequence of cart operations can never be aborted midway by
//! one failing line. Callers learn what happened through the returned
//! outcome, never through an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{AppliedCoupon, CartLine, LineKey, NewLine, OrderTotals};

/// Outcome of [`CartState::add_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with the requested quantity.
    Added,
    /// An existing line accumulated the added quantity.
    Updated {
        /// The line's quantity after accumulation.
        quantity: u32,
    },
    /// The requested quantity exceeded the stock ceiling; the line now
    /// holds exactly the ceiling.
    Limited {
        /// The ceiling the quantity was clamped to.
        ceiling: u32,
    },
    /// The product has no stock at all; the cart is unchanged.
    OutOfStock,
}

/// Outcome of [`CartState::remove_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The line was removed.
    Removed {
        /// Display name of the removed line, for notifications.
        name: String,
    },
    /// No line matched the key; nothing changed.
    NotInCart,
}

/// Outcome of [`CartState::set_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityOutcome {
    /// The quantity was set as requested.
    Set {
        /// The new quantity.
        quantity: u32,
    },
    /// The requested quantity exceeded the stock ceiling; the line now
    /// holds exactly the ceiling.
    Limited {
        /// The ceiling the quantity was clamped to.
        ceiling: u32,
    },
    /// A zero quantity removed the line.
    Removed {
        /// Display name of the removed line.
        name: String,
    },
    /// No line matched the key; nothing changed.
    NotInCart,
}

/// The persisted shape of a cart: lines and coupon in one record.
///
/// Lines and coupon are deliberately one record with one read/write path so
/// they cannot desync in storage. An absent record means an empty cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRecord {
    /// Cart lines in insertion order.
    pub lines: Vec<CartLine>,
    /// Applied coupon, if any.
    pub coupon: Option<AppliedCoupon>,
}

/// In-memory cart state.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    lines: Vec<CartLine>,
    coupon: Option<AppliedCoupon>,
    /// Freshness counter for in-flight coupon validation. Bumped only by
    /// [`Self::clear`]; a validation result carrying an older epoch is
    /// discarded. Not persisted - it guards a single store instance.
    epoch: u64,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from a persisted record.
    #[must_use]
    pub fn from_record(record: CartRecord) -> Self {
        Self {
            lines: record.lines,
            coupon: record.coupon,
            epoch: 0,
        }
    }

    /// Snapshot for persistence.
    #[must_use]
    pub fn to_record(&self) -> CartRecord {
        CartRecord {
            lines: self.lines.clone(),
            coupon: self.coupon.clone(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The applied coupon, if any.
    #[must_use]
    pub fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    /// Discount percentage in effect; zero when no coupon is applied.
    #[must_use]
    pub fn discount_percentage(&self) -> u8 {
        self.coupon.as_ref().map_or(0, |coupon| coupon.percentage)
    }

    /// Current freshness epoch; see [`Self::apply_coupon`].
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Full derived money breakdown for the current state.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::compute(self.subtotal(), self.discount_percentage())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add units of a product to the cart.
    ///
    /// If a line with the same (product, size, color) exists, the quantity
    /// accumulates onto it and the stock ceiling is refreshed from the add;
    /// otherwise a new line is appended. Either way the resulting quantity
    /// is clamped to the ceiling when one is present - an overshoot reports
    /// [`AddOutcome::Limited`] rather than failing. A ceiling of zero
    /// rejects the add outright with [`AddOutcome::OutOfStock`].
    pub fn add_line(&mut self, new: NewLine) -> AddOutcome {
        if new.stock_ceiling == Some(0) {
            return AddOutcome::OutOfStock;
        }

        let key = new.key();
        let requested = new.quantity.get();

        if let Some(existing) = self.lines.iter_mut().find(|line| line.matches(&key)) {
            // Ceiling reflects stock at the time of the most recent update
            existing.stock_ceiling = new.stock_ceiling;
            let wanted = existing.quantity.saturating_add(requested);
            match new.stock_ceiling {
                Some(ceiling) if wanted > ceiling => {
                    existing.quantity = ceiling;
                    AddOutcome::Limited { ceiling }
                }
                _ => {
                    existing.quantity = wanted;
                    AddOutcome::Updated { quantity: wanted }
                }
            }
        } else {
            let (quantity, outcome) = match new.stock_ceiling {
                Some(ceiling) if requested > ceiling => {
                    (ceiling, AddOutcome::Limited { ceiling })
                }
                _ => (requested, AddOutcome::Added),
            };
            self.lines.push(CartLine {
                product_id: new.product_id,
                name: new.name,
                unit_price: new.unit_price,
                quantity,
                size: new.size,
                color: new.color,
                image_url: new.image_url,
                stock_ceiling: new.stock_ceiling,
            });
            outcome
        }
    }

    /// Remove the line matching the key, if present.
    pub fn remove_line(&mut self, key: &LineKey) -> RemoveOutcome {
        match self.lines.iter().position(|line| line.matches(key)) {
            Some(index) => {
                let removed = self.lines.remove(index);
                RemoveOutcome::Removed { name: removed.name }
            }
            None => RemoveOutcome::NotInCart,
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// Zero removes the line; otherwise the quantity is clamped to the
    /// line's stock ceiling and set. A quantity change never reorders lines.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> QuantityOutcome {
        if quantity == 0 {
            return match self.remove_line(key) {
                RemoveOutcome::Removed { name } => QuantityOutcome::Removed { name },
                RemoveOutcome::NotInCart => QuantityOutcome::NotInCart,
            };
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.matches(key)) else {
            return QuantityOutcome::NotInCart;
        };

        match line.stock_ceiling {
            Some(ceiling) if quantity > ceiling => {
                line.quantity = ceiling;
                QuantityOutcome::Limited { ceiling }
            }
            _ => {
                line.quantity = quantity;
                QuantityOutcome::Set { quantity }
            }
        }
    }

    /// Empty the cart: drops every line and any applied coupon, and bumps
    /// the freshness epoch so in-flight coupon validations are discarded.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
        self.epoch += 1;
    }

    /// Record a validated coupon, guarded by the freshness epoch.
    ///
    /// `seen_epoch` is the value of [`Self::epoch`] captured before
    /// validation started. If the cart was cleared in the interim the epoch
    /// no longer matches and the result is discarded silently; returns
    /// whether the coupon was applied.
    pub fn apply_coupon(&mut self, code: &str, percentage: u8, seen_epoch: u64) -> bool {
        if self.epoch != seen_epoch {
            return false;
        }
        self.coupon = Some(AppliedCoupon {
            code: code.trim().to_uppercase(),
            percentage,
        });
        true
    }

    /// Clear the applied coupon, returning it if one was set.
    pub fn remove_coupon(&mut self) -> Option<AppliedCoupon> {
        self.coupon.take()
    }
}
