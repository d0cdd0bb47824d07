//! Database operations for campaigns.

use sqlx::{PgConnection, PgPool};

use storeline_core::{CampaignId, CampaignStatus, StoreId};

use super::RepositoryError;
use crate::models::{Campaign, CreateCampaignInput, UpdateCampaignInput};

const CAMPAIGN_COLUMNS: &str = "id, store_id, name, description, channel, trigger_kind, status, \
     message_template, subject, start_date, end_date, days_before_trigger, discount_code, \
     discount_percentage, skip_if_already_sent, total_sent, total_opened, total_clicked, \
     total_converted, revenue, last_run_at, created_at, updated_at";

/// Create a new campaign in `Draft` status.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub async fn create_campaign(
    pool: &PgPool,
    input: CreateCampaignInput,
) -> Result<Campaign, RepositoryError> {
    let campaign = sqlx::query_as::<_, Campaign>(&format!(
        r"
        INSERT INTO campaigns (
            store_id, name, description, channel, trigger_kind, message_template,
            subject, start_date, end_date, days_before_trigger, discount_code,
            discount_percentage, skip_if_already_sent
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {CAMPAIGN_COLUMNS}
        ",
    ))
    .bind(input.store_id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.channel)
    .bind(input.trigger_kind)
    .bind(input.message_template)
    .bind(input.subject)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.days_before_trigger)
    .bind(input.discount_code)
    .bind(input.discount_percentage)
    .bind(input.skip_if_already_sent)
    .fetch_one(pool)
    .await?;

    Ok(campaign)
}

/// Get a campaign by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_campaign(
    pool: &PgPool,
    campaign_id: CampaignId,
) -> Result<Option<Campaign>, RepositoryError> {
    let campaign = sqlx::query_as::<_, Campaign>(&format!(
        r"
        SELECT {CAMPAIGN_COLUMNS}
        FROM campaigns
        WHERE id = $1
        ",
    ))
    .bind(campaign_id)
    .fetch_optional(pool)
    .await?;

    Ok(campaign)
}

/// List campaigns of a store, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_campaigns(
    pool: &PgPool,
    store_id: StoreId,
) -> Result<Vec<Campaign>, RepositoryError> {
    let campaigns = sqlx::query_as::<_, Campaign>(&format!(
        r"
        SELECT {CAMPAIGN_COLUMNS}
        FROM campaigns
        WHERE store_id = $1
        ORDER BY created_at DESC
        ",
    ))
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(campaigns)
}

/// All campaigns the automation sweep considers: `Active` status with a
/// non-manual trigger.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_automated_active(pool: &PgPool) -> Result<Vec<Campaign>, RepositoryError> {
    let campaigns = sqlx::query_as::<_, Campaign>(&format!(
        r"
        SELECT {CAMPAIGN_COLUMNS}
        FROM campaigns
        WHERE status = 'active' AND trigger_kind <> 'manual'
        ORDER BY id
        ",
    ))
    .fetch_all(pool)
    .await?;

    Ok(campaigns)
}

/// Update a campaign's editable fields. `None` fields keep their value.
///
/// Channel, trigger kind and status are not updatable here.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the campaign does not exist.
pub async fn update_campaign(
    pool: &PgPool,
    campaign_id: CampaignId,
    input: UpdateCampaignInput,
) -> Result<Campaign, RepositoryError> {
    let campaign = sqlx::query_as::<_, Campaign>(&format!(
        r"
        UPDATE campaigns
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            message_template = COALESCE($4, message_template),
            subject = COALESCE($5, subject),
            start_date = COALESCE($6, start_date),
            end_date = COALESCE($7, end_date),
            days_before_trigger = COALESCE($8, days_before_trigger),
            discount_code = COALESCE($9, discount_code),
            discount_percentage = COALESCE($10, discount_percentage),
            skip_if_already_sent = COALESCE($11, skip_if_already_sent),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {CAMPAIGN_COLUMNS}
        ",
    ))
    .bind(campaign_id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.message_template)
    .bind(input.subject)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.days_before_trigger)
    .bind(input.discount_code)
    .bind(input.discount_percentage)
    .bind(input.skip_if_already_sent)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(campaign)
}

/// Set a campaign's lifecycle status.
///
/// Transition legality is checked by the caller against
/// [`CampaignStatus::can_transition_to`]; this function only persists.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the campaign does not exist.
pub async fn set_status(
    pool: &PgPool,
    campaign_id: CampaignId,
    status: CampaignStatus,
) -> Result<Campaign, RepositoryError> {
    let campaign = sqlx::query_as::<_, Campaign>(&format!(
        r"
        UPDATE campaigns
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {CAMPAIGN_COLUMNS}
        ",
    ))
    .bind(campaign_id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(campaign)
}

/// Delete a campaign and its audit trail.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the campaign does not exist.
pub async fn delete_campaign(
    pool: &PgPool,
    campaign_id: CampaignId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
        .bind(campaign_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Apply a dispatch run's effects to the campaign row, inside the run's
/// finalization transaction: bump `total_sent` by the number of successes,
/// stamp `last_run_at`, and move `Scheduled` campaigns to `Active` (one-way).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub async fn apply_run_results(
    conn: &mut PgConnection,
    campaign_id: CampaignId,
    sent: i32,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE campaigns
        SET total_sent = total_sent + $2,
            last_run_at = NOW(),
            status = CASE
                WHEN status = 'scheduled'::campaign_status THEN 'active'::campaign_status
                ELSE status
            END,
            updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(campaign_id)
    .bind(sent)
    .execute(conn)
    .await?;

    Ok(())
}
