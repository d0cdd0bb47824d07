//! Storeline CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! storeline-cli migrate
//!
//! # Seed a demo store with customers, campaigns and sales
//! storeline-cli seed --customers 25
//!
//! # Run one automated-trigger sweep (call this from cron)
//! storeline-cli sweep
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed demo data
//! - `sweep` - Evaluate automated campaign triggers once

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "storeline-cli")]
#[command(author, version, about = "Storeline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed a demo store with customers, campaigns and sales
    Seed {
        /// Number of customers to create
        #[arg(short, long, default_value_t = 25)]
        customers: u32,
    },
    /// Run one automated campaign sweep
    Sweep,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { customers } => commands::seed::run(customers).await?,
        Commands::Sweep => commands::sweep::run().await?,
    }
    Ok(())
}
