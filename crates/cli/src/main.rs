//! Velora CLI - database migrations and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! velora-cli migrate
//!
//! # Insert default site settings and demo categories
//! velora-cli seed
//!
//! # Resend an order-status email
//! velora-cli notify --order-id 0f8e... --status shipped
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use velora_core::{OrderId, OrderStatus};

mod commands;

#[derive(Parser)]
#[command(name = "velora-cli")]
#[command(author, version, about = "Velora CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Insert default site settings and demo categories if absent
    Seed,
    /// Resend the status email for an order
    Notify {
        /// Order to notify about
        #[arg(long)]
        order_id: OrderId,

        /// Status to announce (pending, confirmed, processing, shipped,
        /// delivered, cancelled)
        #[arg(long)]
        status: OrderStatus,
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
        Commands::Seed => commands::seed::run().await?,
        Commands::Notify { order_id, status } => {
            commands::notify::run(order_id, status).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_notify_arguments_are_typed() {
        let cli = Cli::try_parse_from([
            "velora-cli",
            "notify",
            "--order-id",
            "9b2f6c1e-3a4d-4e5f-8a7b-1c2d3e4f5a6b",
            "--status",
            "Shipped",
        ])
        .unwrap();
        let Commands::Notify { status, .. } = cli.command else {
            panic!("expected notify");
        };
        assert_eq!(status, OrderStatus::Shipped);

        assert!(
            Cli::try_parse_from([
                "velora-cli",
                "notify",
                "--order-id",
                "42",
                "--status",
                "shipped",
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "velora-cli",
                "notify",
                "--order-id",
                "9b2f6c1e-3a4d-4e5f-8a7b-1c2d3e4f5a6b",
                "--status",
                "lost",
            ])
            .is_err()
        );
    }
}
