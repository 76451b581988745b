//! Azahar CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the storefront sessions table
//! az-cli migrate storefront
//!
//! # Print the built-in coupon table
//! az-cli coupons list
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `coupons list` - Inspect the built-in coupon table

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "az-cli")]
#[command(author, version, about = "Azahar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Inspect coupon configuration
    Coupons {
        #[command(subcommand)]
        action: CouponAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the storefront sessions table
    Storefront,
}

#[derive(Subcommand)]
enum CouponAction {
    /// Print the built-in coupon table
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
        },
        Commands::Coupons { action } => match action {
            CouponAction::List => commands::coupons::list(),
        },
    }
    Ok(())
}
