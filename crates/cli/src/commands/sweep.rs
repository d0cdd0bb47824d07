//! Sweep command: one automated-trigger evaluation pass.
//!
//! Intended to be driven by cron:
//!
//! ```text
//! 0 * * * *  storeline-cli sweep
//! ```

use chrono::Utc;
use tracing::info;

use storeline_server::db;
use storeline_server::services::automation::TriggerScanner;
use storeline_server::services::dispatcher::CampaignDispatcher;
use storeline_server::services::settings::SettingsProvider;

use super::{CliError, database_url};

/// Run one sweep over all automated campaigns.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// the campaign listing fails. Per-campaign dispatch failures are absorbed
/// into the sweep summary.
pub async fn run() -> Result<(), CliError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let settings = SettingsProvider::new(pool.clone());
    let dispatcher = CampaignDispatcher::new(pool.clone(), settings);
    let scanner = TriggerScanner::new(pool, dispatcher);

    let summary = scanner.scan(Utc::now()).await?;
    info!(
        checked = summary.campaigns_checked,
        dispatched = summary.campaigns_dispatched,
        sent = summary.messages_sent,
        failed = summary.messages_failed,
        "Sweep complete"
    );
    Ok(())
}
