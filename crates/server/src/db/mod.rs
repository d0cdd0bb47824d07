//! Database operations for the Storeline `PostgreSQL` database.
//!
//! # Tables
//!
//! - `stores` - Tenants; every other row is scoped to one
//! - `customers` - Message recipients and their contact fields
//! - `campaigns` - Message programs (channel, template, trigger, counters)
//! - `campaign_logs` - Append-only audit trail of send attempts
//! - `sales` / `sale_items` - Minimal purchase history for the trigger sweep
//! - `system_settings` - Persisted half of the configuration provider chain
//!
//! All queries use the runtime sqlx API (`query_as` / `bind`) so the crate
//! builds without a live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p storeline-cli -- migrate
//! ```

pub mod campaign_logs;
pub mod campaigns;
pub mod customers;
pub mod sales;
pub mod settings;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., empty sale, illegal counter update).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

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
