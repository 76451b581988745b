//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Cart (JSON)
//! GET    /cart                 - Cart view with lines and totals
//! DELETE /cart                 - Empty the cart (lines + coupon)
//! POST   /cart/lines           - Add units of a product
//! PUT    /cart/lines           - Set a line's quantity (0 removes)
//! DELETE /cart/lines           - Remove a line
//! GET    /cart/count           - Total quantity badge value
//! POST   /cart/coupon          - Validate and apply a coupon code
//! DELETE /cart/coupon          - Remove the applied coupon
//!
//! # Checkout
//! POST /checkout               - Submit the cart as an order (requires sign-in)
//! ```

pub mod cart;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route(
            "/lines",
            post(cart::add).put(cart::update).delete(cart::remove),
        )
        .route("/count", get(cart::count))
        .route(
            "/coupon",
            post(cart::apply_coupon).delete(cart::remove_coupon),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
}
