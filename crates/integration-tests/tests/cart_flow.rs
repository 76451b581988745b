//! Cart store flows exercised end-to-end over in-memory storage.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use azahar_core::{AddOutcome, CouponBook, LineKey};
use azahar_integration_tests::line;
use azahar_storefront::cart::{CartStore, MemoryCartStorage};
use azahar_storefront::services::coupons::{CouponError, CouponService};

fn service() -> CouponService {
    CouponService::with_table(CouponBook::builtin())
}

#[tokio::test]
async fn cart_survives_reopening_from_storage() {
    let storage = MemoryCartStorage::new();

    {
        let mut store = CartStore::open(storage.clone()).await;
        store
            .add_line(line("p1", Decimal::new(10, 0), 2, "M", "Negro", Some(5)))
            .await;
        store
            .add_line(line("p2", Decimal::new(1550, 2), 1, "U", "Azul", None))
            .await;
        store.apply_coupon(&service(), "WELCOME10").await.unwrap();
    }

    // A fresh store over the same storage reconstructs the same cart
    let store = CartStore::open(storage).await;
    assert_eq!(store.state().line_count(), 2);
    assert_eq!(store.state().total_quantity(), 3);
    assert_eq!(store.state().discount_percentage(), 10);
    assert_eq!(store.state().subtotal(), Decimal::new(3550, 2));
}

#[tokio::test]
async fn stock_ceiling_holds_across_sessions() {
    let storage = MemoryCartStorage::new();

    {
        let mut store = CartStore::open(storage.clone()).await;
        store
            .add_line(line("p1", Decimal::new(10, 0), 2, "M", "Negro", Some(5)))
            .await;
    }

    let mut store = CartStore::open(storage).await;
    let outcome = store
        .add_line(line("p1", Decimal::new(10, 0), 10, "M", "Negro", Some(5)))
        .await;

    assert_eq!(outcome, AddOutcome::Limited { ceiling: 5 });
    assert_eq!(store.state().total_quantity(), 5);
}

#[tokio::test]
async fn welcome10_example_flow() {
    // Two adds of the same line, then a 10% coupon on the $40 subtotal
    let mut store = CartStore::open(MemoryCartStorage::new()).await;
    store
        .add_line(line("p1", Decimal::new(10, 0), 2, "M", "Negro", Some(5)))
        .await;
    store
        .add_line(line("p1", Decimal::new(10, 0), 2, "M", "Negro", Some(5)))
        .await;

    assert!(store.apply_coupon(&service(), "WELCOME10").await.unwrap());

    let totals = store.totals();
    assert_eq!(totals.subtotal, Decimal::new(40, 0));
    assert_eq!(totals.discount_amount, Decimal::new(4, 0));
    assert_eq!(totals.discounted_subtotal, Decimal::new(36, 0));
    assert_eq!(totals.tax_amount, Decimal::new(324, 2));
    assert_eq!(totals.grand_total, Decimal::new(3924, 2));
}

#[tokio::test]
async fn minimum_not_met_leaves_cart_untouched() {
    let mut store = CartStore::open(MemoryCartStorage::new()).await;
    store
        .add_line(line("p1", Decimal::new(10, 0), 4, "M", "Negro", None))
        .await;
    let before = store.totals();

    let err = store.apply_coupon(&service(), "VIP25").await.unwrap_err();

    assert!(matches!(err, CouponError::Rejected(_)));
    assert!(store.state().coupon().is_none());
    assert_eq!(store.totals(), before);
}

#[tokio::test]
async fn removing_last_line_keeps_coupon_until_clear() {
    let storage = MemoryCartStorage::new();
    let mut store = CartStore::open(storage.clone()).await;
    store
        .add_line(line("p1", Decimal::new(10, 0), 2, "M", "Negro", None))
        .await;
    store.apply_coupon(&service(), "WELCOME10").await.unwrap();

    store.remove_line(&LineKey::new("p1", "M", "Negro")).await;

    assert!(store.state().is_empty());
    assert_eq!(store.state().discount_percentage(), 10);
    assert!(storage.stored().unwrap().coupon.is_some());

    store.clear().await;

    assert!(store.state().coupon().is_none());
    let stored = storage.stored().unwrap();
    assert!(stored.lines.is_empty());
    assert!(stored.coupon.is_none());
}

#[tokio::test]
async fn storage_write_failure_degrades_durability_not_function() {
    let storage = MemoryCartStorage::new();
    let mut store = CartStore::open(storage.clone()).await;
    store
        .add_line(line("p1", Decimal::new(10, 0), 1, "M", "Negro", None))
        .await;

    storage.fail_writes(true);
    store
        .add_line(line("p2", Decimal::new(5, 0), 1, "M", "Rojo", None))
        .await;
    store.apply_coupon(&service(), "WELCOME10").await.unwrap();

    // In-memory state is authoritative for the rest of the session
    assert_eq!(store.state().line_count(), 2);
    assert_eq!(store.state().discount_percentage(), 10);
    assert_eq!(store.totals().discount_amount, Decimal::new(150, 2));

    // Storage still holds the last successful write
    let stored = storage.stored().unwrap();
    assert_eq!(stored.lines.len(), 1);
    assert!(stored.coupon.is_none());
}
