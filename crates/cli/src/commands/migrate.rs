//! Database migration command.
//!
//! Applies the migrations embedded from `crates/server/migrations/` to the
//! database named by `STORELINE_DATABASE_URL` (or `DATABASE_URL`).

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use super::{CliError, database_url};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), CliError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
