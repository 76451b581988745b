//! Checkout route handler.
//!
//! Snapshots the cart and shipping form into an order request and hands it
//! to the order service, which owns price recomputation, order creation,
//! and stock decrements. The totals computed here are display-only and are
//! never trusted as the charged amount.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CartStore, SessionCartStorage};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::{CurrentUser, keys};
use crate::services::orders::{OrderConfirmation, OrderRequest, ShippingDetails};
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping: ShippingDetails,
}

/// Checkout response body.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: OrderConfirmation,
}

/// Submit the cart as an order.
///
/// Preconditions: a signed-in session and a non-empty cart. On acceptance
/// the cart is cleared; on rejection it is left untouched so the customer
/// can retry - no automatic retry is performed here.
#[instrument(skip(state, session, body))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    // Caller-level sign-in check; the auth flow itself lives at the boundary
    let user: Option<CurrentUser> = session.get(keys::CURRENT_USER).await?;
    let Some(user) = user else {
        return Err(AppError::Unauthorized(
            "sign in to complete checkout".to_string(),
        ));
    };

    let mut store = CartStore::open(SessionCartStorage::new(session)).await;
    if store.state().is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let request = OrderRequest::from_cart(store.state(), body.shipping);

    // A rejection propagates here and leaves the cart untouched for retry
    let confirmation = state.orders().submit(&request).await?;

    store.clear().await;

    add_breadcrumb(
        "checkout",
        "Order submitted",
        Some(&[("order_id", &confirmation.id), ("email", &user.email)]),
    );

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order: confirmation,
        }),
    ))
}
