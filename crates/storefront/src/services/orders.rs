//! Order creation service client.
//!
//! The order service is the authoritative writer of committed orders and
//! stock decrements. The storefront only snapshots the cart and shipping
//! form into a request payload; prices in the payload are advisory, and the
//! service recomputes charges from its own product records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use azahar_core::CartState;

use crate::config::CheckoutConfig;

/// Why an order submission failed.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The order service rejected the order, with its reason. The cart must
    /// be preserved so the customer can retry.
    #[error("{0}")]
    Rejected(String),

    /// The request failed in transport.
    #[error("order submission failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Shipping details captured from the checkout form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One line of an order request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub price: Decimal,
    pub size: String,
    pub color: String,
}

/// Payload sent to the order creation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    pub shipping: ShippingDetails,
}

impl OrderRequest {
    /// Snapshot a cart into a request payload.
    #[must_use]
    pub fn from_cart(cart: &CartState, shipping: ShippingDetails) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                price: line.unit_price,
                size: line.size.clone(),
                color: line.color.clone(),
            })
            .collect();

        Self { items, shipping }
    }
}

/// The created order record returned by the order service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub id: String,
    pub status: String,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Wire response on rejection.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    error: String,
}

/// Client for the order creation service.
#[derive(Debug)]
pub struct OrderClient {
    client: reqwest::Client,
    endpoint: String,
    token: SecretString,
}

impl OrderClient {
    /// Create a client from checkout configuration.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be constructed.
    pub fn new(config: &CheckoutConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            endpoint: config.order_service_url.clone(),
            token: config.order_service_token.clone(),
        })
    }

    /// Submit an order.
    ///
    /// No automatic retry: a rejection or transport failure is surfaced to
    /// the caller, which preserves the cart.
    ///
    /// # Errors
    ///
    /// `SubmissionError::Rejected` when the service refuses the order,
    /// `SubmissionError::Http` on transport failure.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn submit(&self, request: &OrderRequest) -> Result<OrderConfirmation, SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.token.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status.is_client_error() {
            let reason = response
                .json::<RejectionBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("order was rejected ({status})"));
            return Err(SubmissionError::Rejected(reason));
        }

        let response = response.error_for_status()?;
        let confirmation: OrderConfirmation = response.json().await?;

        tracing::info!(order_id = %confirmation.id, "Order created");
        Ok(confirmation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use azahar_core::NewLine;

    use super::*;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            name: "Ana Morales".to_string(),
            email: "ana@example.com".to_string(),
            address: "Calle Luna 4".to_string(),
            city: "Sevilla".to_string(),
            zip: "41001".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_from_cart_snapshots_every_line() {
        let mut cart = CartState::new();
        cart.add_line(NewLine {
            product_id: "p1".to_string(),
            name: "Camiseta".to_string(),
            unit_price: Decimal::new(10, 0),
            quantity: NonZeroU32::new(2).unwrap(),
            size: "M".to_string(),
            color: "Negro".to_string(),
            image_url: String::new(),
            stock_ceiling: Some(5),
        });
        cart.add_line(NewLine {
            product_id: "p2".to_string(),
            name: "Gorra".to_string(),
            unit_price: Decimal::new(1550, 2),
            quantity: NonZeroU32::new(1).unwrap(),
            size: "U".to_string(),
            color: "Azul".to_string(),
            image_url: String::new(),
            stock_ceiling: None,
        });

        let request = OrderRequest::from_cart(&cart, shipping());

        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].product_id, "p1");
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.items[1].price, Decimal::new(1550, 2));
    }

    #[test]
    fn test_order_item_wire_shape_is_camel_case() {
        let item = OrderItem {
            product_id: "p1".to_string(),
            quantity: 2,
            price: Decimal::new(10, 0),
            size: "M".to_string(),
            color: "Negro".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("productId").is_some());
        assert!(json.get("product_id").is_none());
    }

    #[test]
    fn test_shipping_phone_omitted_when_absent() {
        let json = serde_json::to_value(shipping()).unwrap();
        assert!(json.get("phone").is_none());
    }
}
