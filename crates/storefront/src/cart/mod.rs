//! Session cart store.
//!
//! [`CartStore`] is the explicit store object all cart operations go
//! through: it owns a `CartState`, rehydrates it once from the storage port
//! when opened, and persists the full record after every successful
//! mutation. Persistence failures are logged and swallowed - the in-memory
//! cart remains authoritative for the session (degraded durability, not
//! degraded function).
//!
//! Lines and coupon are saved as one record through one write path, so the
//! two can never desync in storage.

pub mod memory;
pub mod session;

pub use memory::MemoryCartStorage;
pub use session::SessionCartStorage;

use std::future::Future;

use thiserror::Error;
use tracing::instrument;

use azahar_core::{
    AddOutcome, AppliedCoupon, CartRecord, CartState, LineKey, NewLine, OrderTotals,
    QuantityOutcome, RemoveOutcome,
};

use crate::services::coupons::{CouponError, CouponService};

/// Failure of the cart persistence backend.
#[derive(Debug, Error)]
#[error("cart storage failure: {0}")]
pub struct StorageError(pub String);

/// Persistence port for the serialized cart record.
///
/// One record, one load path, one save path. An absent record means "no
/// cart saved yet", not an error.
pub trait CartStorage {
    /// Load the persisted record, if any.
    fn load(&self) -> impl Future<Output = Result<Option<CartRecord>, StorageError>> + Send;

    /// Persist the record, replacing any previous one.
    fn save(&self, record: &CartRecord) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// The cart store: in-memory state plus its persistence port.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    state: CartState,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open a store over the given storage, rehydrating any persisted
    /// record. A load failure starts an empty cart rather than blocking the
    /// session.
    pub async fn open(storage: S) -> Self {
        let state = match storage.load().await {
            Ok(Some(record)) => CartState::from_record(record),
            Ok(None) => CartState::new(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load cart record, starting empty");
                CartState::new()
            }
        };

        Self { state, storage }
    }

    /// The current cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Derived money breakdown for the current state.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        self.state.totals()
    }

    /// Add units of a product; see [`CartState::add_line`]. Persists unless
    /// the add was rejected outright.
    pub async fn add_line(&mut self, line: NewLine) -> AddOutcome {
        let outcome = self.state.add_line(line);
        if outcome != AddOutcome::OutOfStock {
            self.persist().await;
        }
        outcome
    }

    /// Remove the line matching the key. Persists only when something was
    /// removed.
    pub async fn remove_line(&mut self, key: &LineKey) -> RemoveOutcome {
        let outcome = self.state.remove_line(key);
        if matches!(outcome, RemoveOutcome::Removed { .. }) {
            self.persist().await;
        }
        outcome
    }

    /// Set the quantity of an existing line; zero removes it.
    pub async fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> QuantityOutcome {
        let outcome = self.state.set_quantity(key, quantity);
        if outcome != QuantityOutcome::NotInCart {
            self.persist().await;
        }
        outcome
    }

    /// Empty the cart, dropping lines and coupon together.
    pub async fn clear(&mut self) {
        self.state.clear();
        self.persist().await;
    }

    /// Validate a coupon against the current subtotal and apply it.
    ///
    /// The freshness epoch is captured before the (possibly remote)
    /// validation; if the cart is cleared while the lookup is in flight the
    /// grant is discarded silently and `Ok(false)` is returned. Other
    /// mutations during the lookup do not invalidate the result.
    ///
    /// # Errors
    ///
    /// Propagates [`CouponError`] from the service; the cart is unchanged on
    /// any error.
    #[instrument(skip(self, service), fields(code = %code))]
    pub async fn apply_coupon(
        &mut self,
        service: &CouponService,
        code: &str,
    ) -> Result<bool, CouponError> {
        let subtotal = self.state.subtotal();
        let seen_epoch = self.state.epoch();

        let grant = service.validate(code, subtotal).await?;

        let applied = self.state.apply_coupon(code, grant.percentage, seen_epoch);
        if applied {
            self.persist().await;
        } else {
            tracing::debug!(code, "Discarding coupon grant for a cleared cart");
        }
        Ok(applied)
    }

    /// Drop the applied coupon, returning it if one was set.
    pub async fn remove_coupon(&mut self) -> Option<AppliedCoupon> {
        let removed = self.state.remove_coupon();
        if removed.is_some() {
            self.persist().await;
        }
        removed
    }

    /// Persist the current record. Failures are logged and swallowed; the
    /// in-memory cart stays authoritative for the rest of the session.
    async fn persist(&self) {
        if let Err(err) = self.storage.save(&self.state.to_record()).await {
            tracing::warn!(error = %err, "Failed to persist cart record; keeping in-memory state");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use azahar_core::CouponBook;
    use rust_decimal::Decimal;

    use super::*;

    fn new_line(product_id: &str, quantity: u32, ceiling: Option<u32>) -> NewLine {
        NewLine {
            product_id: product_id.to_string(),
            name: format!("Producto {product_id}"),
            unit_price: Decimal::new(10, 0),
            quantity: NonZeroU32::new(quantity).unwrap(),
            size: "M".to_string(),
            color: "Negro".to_string(),
            image_url: String::new(),
            stock_ceiling: ceiling,
        }
    }

    fn service() -> CouponService {
        CouponService::with_table(CouponBook::builtin())
    }

    #[tokio::test]
    async fn test_open_rehydrates_persisted_record() {
        let storage = MemoryCartStorage::new();

        let mut store = CartStore::open(storage.clone()).await;
        store.add_line(new_line("p1", 2, Some(5))).await;
        store.apply_coupon(&service(), "WELCOME10").await.unwrap();

        // A second store over the same storage sees the same cart
        let reopened = CartStore::open(storage).await;
        assert_eq!(reopened.state().total_quantity(), 2);
        assert_eq!(reopened.state().discount_percentage(), 10);
    }

    #[tokio::test]
    async fn test_mutations_persist_after_each_operation() {
        let storage = MemoryCartStorage::new();
        let mut store = CartStore::open(storage.clone()).await;

        store.add_line(new_line("p1", 2, None)).await;
        assert_eq!(storage.stored().unwrap().lines.len(), 1);

        store
            .set_quantity(&LineKey::new("p1", "M", "Negro"), 4)
            .await;
        assert_eq!(storage.stored().unwrap().lines[0].quantity, 4);

        store.remove_line(&LineKey::new("p1", "M", "Negro")).await;
        assert!(storage.stored().unwrap().lines.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_state() {
        let storage = MemoryCartStorage::new();
        let mut store = CartStore::open(storage.clone()).await;
        store.add_line(new_line("p1", 1, None)).await;

        storage.fail_writes(true);
        store.add_line(new_line("p2", 1, None)).await;

        // The mutation held in memory even though the save failed
        assert_eq!(store.state().line_count(), 2);
        assert_eq!(storage.stored().unwrap().lines.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_drops_lines_and_coupon_in_storage() {
        let storage = MemoryCartStorage::new();
        let mut store = CartStore::open(storage.clone()).await;
        store.add_line(new_line("p1", 2, None)).await;
        store.apply_coupon(&service(), "WELCOME10").await.unwrap();

        store.clear().await;

        let stored = storage.stored().unwrap();
        assert!(stored.lines.is_empty());
        assert!(stored.coupon.is_none());
    }

    #[tokio::test]
    async fn test_apply_coupon_rejection_leaves_cart_unchanged() {
        let storage = MemoryCartStorage::new();
        let mut store = CartStore::open(storage.clone()).await;
        store.add_line(new_line("p1", 2, None)).await;

        let err = store.apply_coupon(&service(), "VIP25").await.unwrap_err();
        assert!(matches!(err, CouponError::Rejected(_)));
        assert!(store.state().coupon().is_none());
        assert!(storage.stored().unwrap().coupon.is_none());
    }

    #[tokio::test]
    async fn test_coupon_round_trip_restores_totals() {
        let storage = MemoryCartStorage::new();
        let mut store = CartStore::open(storage).await;
        store.add_line(new_line("p1", 4, None)).await;
        let before = store.totals().grand_total;

        assert!(store.apply_coupon(&service(), "welcome10").await.unwrap());
        assert_eq!(store.totals().discount_amount, Decimal::new(4, 0));

        store.remove_coupon().await;
        assert_eq!(store.totals().grand_total, before);
    }
}
