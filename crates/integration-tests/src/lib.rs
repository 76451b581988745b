//! Shared helpers for Azahar integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::num::NonZeroU32;

use rust_decimal::Decimal;

use azahar_core::NewLine;
use azahar_storefront::services::orders::ShippingDetails;

/// Build a `NewLine` for tests.
///
/// # Panics
///
/// Panics if `quantity` is zero.
#[must_use]
pub fn line(
    product_id: &str,
    unit_price: Decimal,
    quantity: u32,
    size: &str,
    color: &str,
    stock_ceiling: Option<u32>,
) -> NewLine {
    NewLine {
        product_id: product_id.to_string(),
        name: format!("Producto {product_id}"),
        unit_price,
        quantity: NonZeroU32::new(quantity).expect("test quantity must be nonzero"),
        size: size.to_string(),
        color: color.to_string(),
        image_url: format!("https://img.example/{product_id}.jpg"),
        stock_ceiling,
    }
}

/// A filled-in shipping form.
#[must_use]
pub fn shipping() -> ShippingDetails {
    ShippingDetails {
        name: "Ana Morales".to_string(),
        email: "ana@example.com".to_string(),
        address: "Calle Luna 4".to_string(),
        city: "Sevilla".to_string(),
        zip: "41001".to_string(),
        phone: Some("+34 600 000 000".to_string()),
    }
}
