//! Database migration commands.

use secrecy::SecretString;
use tower_sessions_sqlx_store::PostgresStore;

/// Create the storefront sessions table.
///
/// Reads `STOREFRONT_DATABASE_URL` (falling back to `DATABASE_URL`) and
/// runs the tower-sessions store migration, which is idempotent.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the migration fails.
pub async fn storefront() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "STOREFRONT_DATABASE_URL is not set")?;

    let pool = azahar_storefront::db::create_pool(&database_url).await?;

    let store = PostgresStore::new(pool);
    store.migrate().await?;

    tracing::info!("storefront sessions table migrated");
    Ok(())
}
