//! Azahar Core - checkout domain library.
//!
//! This crate provides the domain logic shared across Azahar components:
//! - `storefront` - Public-facing e-commerce service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere: the cart algebra, coupon validation, and totals math are
//! all synchronous functions over plain values.
//!
//! # Modules
//!
//! - [`cart`] - Cart line algebra: accumulation, stock clamping, coupon state
//! - [`coupon`] - Fixed coupon table and validation
//! - [`types`] - Lines, coupons, and derived order totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod coupon;
pub mod types;

pub use cart::{AddOutcome, CartRecord, CartState, QuantityOutcome, RemoveOutcome};
pub use coupon::{CouponBook, CouponRejection};
pub use types::*;
