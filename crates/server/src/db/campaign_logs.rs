//! Database operations for the campaign audit trail.
//!
//! Rows are append-only: there is deliberately no update function here.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use storeline_core::{CampaignId, CustomerId};

use super::RepositoryError;
use crate::models::{CampaignLogWithCustomer, NewCampaignLog};

/// Insert one audit entry.
///
/// Takes a connection rather than the pool so the dispatcher can batch all of
/// a run's entries into its finalization transaction.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub async fn insert_log(
    conn: &mut PgConnection,
    entry: &NewCampaignLog,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO campaign_logs (
            campaign_id, customer_id, message_sent, status, channel, error_message
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(entry.campaign_id)
    .bind(entry.customer_id)
    .bind(&entry.message_sent)
    .bind(entry.status)
    .bind(&entry.channel)
    .bind(&entry.error_message)
    .execute(conn)
    .await?;

    Ok(())
}

/// List a campaign's audit entries, most recent first, with the recipient's
/// name joined in.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_logs(
    pool: &PgPool,
    campaign_id: CampaignId,
    limit: i64,
    offset: i64,
) -> Result<Vec<CampaignLogWithCustomer>, RepositoryError> {
    let logs = sqlx::query_as::<_, CampaignLogWithCustomer>(
        r"
        SELECT
            l.id, l.customer_id, c.name AS customer_name, l.message_sent,
            l.status, l.channel, l.error_message, l.sent_at
        FROM campaign_logs l
        JOIN customers c ON c.id = l.customer_id
        WHERE l.campaign_id = $1
        ORDER BY l.sent_at DESC, l.id DESC
        LIMIT $2 OFFSET $3
        ",
    )
    .bind(campaign_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

/// Total number of audit entries for a campaign.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn count_logs(pool: &PgPool, campaign_id: CampaignId) -> Result<i64, RepositoryError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM campaign_logs WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// IDs of customers that already have a successful audit entry for this
/// campaign, optionally restricted to entries at or after `since`. Used for
/// re-send suppression.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn customers_already_sent(
    pool: &PgPool,
    campaign_id: CampaignId,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<CustomerId>, RepositoryError> {
    let ids = sqlx::query_scalar::<_, CustomerId>(
        r"
        SELECT DISTINCT customer_id
        FROM campaign_logs
        WHERE campaign_id = $1
          AND status = 'sent'
          AND ($2::timestamptz IS NULL OR sent_at >= $2)
        ",
    )
    .bind(campaign_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
