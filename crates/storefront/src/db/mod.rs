//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `azahar_storefront`
//!
//! The storefront keeps almost nothing locally - orders and stock live
//! behind the order service:
//!
//! ## Tables
//!
//! - `sessions` - Tower-sessions storage (signed-in identity + cart record)
//!
//! # Migrations
//!
//! The sessions table is created via:
//! ```bash
//! cargo run -p azahar-cli -- migrate storefront
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
