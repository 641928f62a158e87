//! Frost Network CLI - database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront and session-store migrations
//! frost-cli migrate
//!
//! # Grant or revoke the admin role
//! frost-cli admin grant -e steve@example.com
//! frost-cli admin revoke -e steve@example.com
//!
//! # Record a completed demo purchase so the leaderboard has data
//! frost-cli seed purchases -e steve@example.com -a 49.99
//! ```
//!
//! All commands read `FROST_DATABASE_URL` (or `DATABASE_URL`), loading
//! `.env` when present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "frost-cli")]
#[command(author, version, about = "Frost Network store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the admin role
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed demo data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Give an existing account the admin role
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Return an account to the regular user role
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Record a completed purchase for an account
    Purchases {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Purchase amount in dollars (e.g. `49.99`)
        #[arg(short, long)]
        amount: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => {
                commands::admin::set_role(&email, frost_core::UserRole::Admin).await?;
            }
            AdminAction::Revoke { email } => {
                commands::admin::set_role(&email, frost_core::UserRole::User).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Purchases { email, amount } => {
                commands::seed::purchase(&email, &amount).await?;
            }
        },
    }
    Ok(())
}
