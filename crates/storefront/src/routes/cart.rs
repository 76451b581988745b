//! Cart route handlers.
//!
//! Every mutation responds with JSON: what happened, a user-facing message,
//! and the refreshed cart view. Stock violations clamp and report rather
//! than fail, so cart mutations answer 200 with an outcome field - only
//! malformed requests and coupon/service failures become error statuses.

use std::num::NonZeroU32;

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use azahar_core::{
    AddOutcome, CartLine, CartState, LineKey, NewLine, OrderTotals, QuantityOutcome, RemoveOutcome,
};

use crate::cart::{CartStore, SessionCartStorage};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: String,
}

/// Money breakdown display data.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub subtotal: String,
    pub discount: String,
    pub discounted_subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub grand_total: String,
}

/// Applied coupon display data.
#[derive(Debug, Clone, Serialize)]
pub struct CouponView {
    pub code: String,
    pub percentage: u8,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub coupon: Option<CouponView>,
    pub totals: TotalsView,
    pub total_quantity: u32,
    pub line_count: usize,
}

/// Format a decimal amount as a price string.
fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            unit_price: format_price(line.unit_price),
            line_total: format_price(line.line_total()),
            image_url: line.image_url.clone(),
        }
    }
}

impl From<OrderTotals> for TotalsView {
    fn from(totals: OrderTotals) -> Self {
        Self {
            subtotal: format_price(totals.subtotal),
            discount: format_price(totals.discount_amount),
            discounted_subtotal: format_price(totals.discounted_subtotal),
            tax: format_price(totals.tax_amount),
            shipping: format_price(totals.shipping),
            grand_total: format_price(totals.grand_total),
        }
    }
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        Self {
            lines: state.lines().iter().map(CartLineView::from).collect(),
            coupon: state.coupon().map(|coupon| CouponView {
                code: coupon.code.clone(),
                percentage: coupon.percentage,
            }),
            totals: state.totals().into(),
            total_quantity: state.total_quantity(),
            line_count: state.line_count(),
        }
    }
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub image_url: String,
    pub stock_ceiling: Option<u32>,
}

/// Line identity request body.
#[derive(Debug, Deserialize)]
pub struct LineKeyRequest {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

impl LineKeyRequest {
    fn key(&self) -> LineKey {
        LineKey::new(
            self.product_id.clone(),
            self.size.clone(),
            self.color.clone(),
        )
    }
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub product_id: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

/// Coupon request body.
#[derive(Debug, Deserialize)]
pub struct CouponRequest {
    pub code: String,
}

/// Response for cart mutations: what happened plus the refreshed cart.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub outcome: &'static str,
    pub message: String,
    pub cart: CartView,
}

/// Response for the cart count badge.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Open the session-backed cart store for this request.
async fn open_store(session: Session) -> CartStore<SessionCartStorage> {
    CartStore::open(SessionCartStorage::new(session)).await
}

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let store = open_store(session).await;
    Json(CartView::from(store.state()))
}

/// Cart count badge value.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CountResponse> {
    let store = open_store(session).await;
    Json(CountResponse {
        count: store.state().total_quantity(),
    })
}

/// Add units of a product to the cart.
#[instrument(skip(session, body), fields(product_id = %body.product_id))]
pub async fn add(session: Session, Json(body): Json<AddLineRequest>) -> Result<Json<MutationResponse>> {
    let Some(quantity) = NonZeroU32::new(body.quantity) else {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    };

    let name = body.name.clone();
    let mut store = open_store(session).await;
    let outcome = store
        .add_line(NewLine {
            product_id: body.product_id.clone(),
            name: body.name,
            unit_price: body.unit_price,
            quantity,
            size: body.size,
            color: body.color,
            image_url: body.image_url,
            stock_ceiling: body.stock_ceiling,
        })
        .await;

    add_breadcrumb("cart", "Added line", Some(&[("product_id", &body.product_id)]));

    let (outcome, message) = match outcome {
        AddOutcome::Added => ("added", format!("{name} added to cart")),
        AddOutcome::Updated { quantity } => {
            ("updated", format!("{name} quantity updated to {quantity}"))
        }
        AddOutcome::Limited { ceiling } => {
            ("stock_limited", format!("Only {ceiling} of {name} available"))
        }
        AddOutcome::OutOfStock => ("out_of_stock", format!("{name} is out of stock")),
    };

    Ok(Json(MutationResponse {
        outcome,
        message,
        cart: CartView::from(store.state()),
    }))
}

/// Set a line's quantity; zero removes the line.
#[instrument(skip(session, body), fields(product_id = %body.product_id))]
pub async fn update(
    session: Session,
    Json(body): Json<SetQuantityRequest>,
) -> Result<Json<MutationResponse>> {
    let key = LineKey::new(
        body.product_id.clone(),
        body.size.clone(),
        body.color.clone(),
    );

    let mut store = open_store(session).await;
    let (outcome, message) = match store.set_quantity(&key, body.quantity).await {
        QuantityOutcome::Set { quantity } => ("updated", format!("Quantity set to {quantity}")),
        QuantityOutcome::Limited { ceiling } => {
            ("stock_limited", format!("Only {ceiling} available"))
        }
        QuantityOutcome::Removed { name } => ("removed", format!("{name} removed from cart")),
        QuantityOutcome::NotInCart => ("not_in_cart", "Item is not in the cart".to_string()),
    };

    Ok(Json(MutationResponse {
        outcome,
        message,
        cart: CartView::from(store.state()),
    }))
}

/// Remove a line from the cart.
#[instrument(skip(session, body), fields(product_id = %body.product_id))]
pub async fn remove(
    session: Session,
    Json(body): Json<LineKeyRequest>,
) -> Result<Json<MutationResponse>> {
    let mut store = open_store(session).await;
    let (outcome, message) = match store.remove_line(&body.key()).await {
        RemoveOutcome::Removed { name } => ("removed", format!("{name} removed from cart")),
        RemoveOutcome::NotInCart => ("not_in_cart", "Item is not in the cart".to_string()),
    };

    Ok(Json(MutationResponse {
        outcome,
        message,
        cart: CartView::from(store.state()),
    }))
}

/// Empty the cart: lines and coupon together.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Json<MutationResponse> {
    let mut store = open_store(session).await;
    store.clear().await;

    Json(MutationResponse {
        outcome: "cleared",
        message: "Cart emptied".to_string(),
        cart: CartView::from(store.state()),
    })
}

/// Validate and apply a coupon code.
///
/// Rejections surface as 400 with the rejection reason and leave the cart
/// unchanged; a grant that arrives after the cart was cleared is discarded.
#[instrument(skip(state, session, body))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CouponRequest>,
) -> Result<Json<MutationResponse>> {
    if body.code.trim().is_empty() {
        return Err(AppError::BadRequest("coupon code must not be empty".to_string()));
    }

    let mut store = open_store(session).await;
    let applied = store.apply_coupon(state.coupons(), &body.code).await?;

    let (outcome, message) = if applied {
        let percentage = store.state().discount_percentage();
        add_breadcrumb("cart", "Coupon applied", Some(&[("code", &body.code)]));
        ("coupon_applied", format!("Coupon applied: {percentage}% off"))
    } else {
        ("not_applied", "Coupon was not applied".to_string())
    };

    Ok(Json(MutationResponse {
        outcome,
        message,
        cart: CartView::from(store.state()),
    }))
}

/// Remove the applied coupon.
#[instrument(skip(session))]
pub async fn remove_coupon(session: Session) -> Json<MutationResponse> {
    let mut store = open_store(session).await;
    let (outcome, message) = match store.remove_coupon().await {
        Some(coupon) => ("coupon_removed", format!("Coupon {} removed", coupon.code)),
        None => ("no_coupon", "No coupon to remove".to_string()),
    };

    Json(MutationResponse {
        outcome,
        message,
        cart: CartView::from(store.state()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(3924, 2)), "$39.24");
        assert_eq!(format_price(Decimal::new(40, 0)), "$40.00");
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_cart_view_from_state() {
        let mut state = CartState::new();
        state.add_line(NewLine {
            product_id: "p1".to_string(),
            name: "Camiseta".to_string(),
            unit_price: Decimal::new(10, 0),
            quantity: NonZeroU32::new(4).unwrap(),
            size: "M".to_string(),
            color: "Negro".to_string(),
            image_url: "https://img.example/p1.jpg".to_string(),
            stock_ceiling: Some(5),
        });
        state.apply_coupon("WELCOME10", 10, state.epoch());

        let view = CartView::from(&state);
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].line_total, "$40.00");
        assert_eq!(view.totals.discount, "$4.00");
        assert_eq!(view.totals.grand_total, "$39.24");
        assert_eq!(view.coupon.as_ref().unwrap().code, "WELCOME10");
        assert_eq!(view.total_quantity, 4);
    }
}
