//! Order submission payload construction.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use azahar_core::{CartState, CouponBook};
use azahar_integration_tests::{line, shipping};
use azahar_storefront::cart::{CartStore, MemoryCartStorage};
use azahar_storefront::services::coupons::CouponService;
use azahar_storefront::services::orders::OrderRequest;

#[tokio::test]
async fn payload_snapshots_cart_lines_and_shipping() {
    let mut store = CartStore::open(MemoryCartStorage::new()).await;
    store
        .add_line(line("p1", Decimal::new(10, 0), 2, "M", "Negro", Some(5)))
        .await;
    store
        .add_line(line("p2", Decimal::new(1550, 2), 1, "U", "Azul", None))
        .await;

    let request = OrderRequest::from_cart(store.state(), shipping());

    assert_eq!(request.items.len(), 2);
    assert_eq!(request.items[0].product_id, "p1");
    assert_eq!(request.items[0].quantity, 2);
    assert_eq!(request.items[0].size, "M");
    assert_eq!(request.items[0].color, "Negro");
    assert_eq!(request.items[1].price, Decimal::new(1550, 2));
    assert_eq!(request.shipping.city, "Sevilla");
}

#[tokio::test]
async fn payload_carries_no_client_totals() {
    // The order service recomputes charges; the payload must not claim a
    // total, even when a coupon discounts the displayed amount
    let service = CouponService::with_table(CouponBook::builtin());
    let mut store = CartStore::open(MemoryCartStorage::new()).await;
    store
        .add_line(line("p1", Decimal::new(100, 0), 1, "M", "Negro", None))
        .await;
    store.apply_coupon(&service, "VIP25").await.unwrap();

    let request = OrderRequest::from_cart(store.state(), shipping());
    let json = serde_json::to_value(&request).unwrap();

    assert!(json.get("total").is_none());
    assert!(json.get("grandTotal").is_none());
    // Item prices are the advisory unit prices, untouched by the discount
    assert_eq!(json["items"][0]["price"], "100");
}

#[test]
fn payload_wire_shape_matches_order_service_contract() {
    let mut cart = CartState::new();
    let mut add = line("p1", Decimal::new(10, 0), 2, "M", "Negro", Some(5));
    add.image_url = String::new();
    cart.add_line(add);

    let request = OrderRequest::from_cart(&cart, shipping());
    let json = serde_json::to_value(&request).unwrap();

    let item = &json["items"][0];
    assert!(item.get("productId").is_some());
    assert!(item.get("quantity").is_some());
    assert!(item.get("price").is_some());
    assert!(item.get("size").is_some());
    assert!(item.get("color").is_some());
    // Display-only fields stay out of the payload
    assert!(item.get("name").is_none());
    assert!(item.get("imageUrl").is_none());

    let shipping = &json["shipping"];
    for field in ["name", "email", "address", "city", "zip", "phone"] {
        assert!(shipping.get(field).is_some(), "missing shipping field {field}");
    }
}
