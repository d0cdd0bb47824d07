//! Campaign domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeline_core::{CampaignId, CampaignStatus, Channel, StoreId, TriggerKind};

/// A configured message program: channel, template, trigger and targeting.
///
/// The engagement counters (`total_sent` and friends) are cumulative and
/// non-decreasing; only the dispatcher updates them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    /// Unique campaign ID.
    pub id: CampaignId,
    /// Store this campaign belongs to.
    pub store_id: StoreId,
    /// Campaign name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Transport the campaign sends through; fixed at creation.
    pub channel: Channel,
    /// Condition that causes automated execution.
    pub trigger_kind: TriggerKind,
    /// Lifecycle status.
    pub status: CampaignStatus,
    /// Message template with `{token}` placeholders.
    pub message_template: String,
    /// Subject line (Email campaigns only).
    pub subject: Option<String>,
    /// Window start; gates festival-trigger sweeps.
    pub start_date: Option<DateTime<Utc>>,
    /// Window end; gates festival-trigger sweeps.
    pub end_date: Option<DateTime<Utc>>,
    /// Lead time for date-relative triggers (birthday, warranty expiry).
    pub days_before_trigger: Option<i32>,
    /// Discount code exposed to the template as `{discount_code}`.
    pub discount_code: Option<String>,
    /// Discount percentage exposed to the template as `{discount}`.
    pub discount_percentage: Option<f64>,
    /// When true, recipients with a prior successful send for this campaign
    /// (since `start_date`, or ever if unset) are skipped.
    pub skip_if_already_sent: bool,
    /// Successful sends accumulated over the campaign's lifetime.
    pub total_sent: i32,
    /// Opens accumulated over the campaign's lifetime.
    pub total_opened: i32,
    /// Clicks accumulated over the campaign's lifetime.
    pub total_clicked: i32,
    /// Conversions accumulated over the campaign's lifetime.
    pub total_converted: i32,
    /// Revenue attributed to the campaign.
    pub revenue: Decimal,
    /// When the dispatcher last ran this campaign.
    pub last_run_at: Option<DateTime<Utc>>,
    /// When the campaign was created.
    pub created_at: DateTime<Utc>,
    /// When the campaign was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new campaign. Campaigns start in `Draft`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignInput {
    /// Store the campaign belongs to.
    pub store_id: StoreId,
    /// Campaign name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Transport to send through.
    pub channel: Channel,
    /// Trigger condition.
    #[serde(default)]
    pub trigger_kind: TriggerKind,
    /// Message template.
    pub message_template: String,
    /// Subject line (Email only).
    pub subject: Option<String>,
    /// Window start.
    pub start_date: Option<DateTime<Utc>>,
    /// Window end.
    pub end_date: Option<DateTime<Utc>>,
    /// Lead time for date-relative triggers.
    pub days_before_trigger: Option<i32>,
    /// Discount code.
    pub discount_code: Option<String>,
    /// Discount percentage.
    pub discount_percentage: Option<f64>,
    /// Re-send suppression policy.
    #[serde(default)]
    pub skip_if_already_sent: bool,
}

/// Input for updating a campaign. `None` fields are left unchanged.
///
/// Channel and trigger kind are fixed at creation and cannot be updated;
/// status changes go through the dedicated transition endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCampaignInput {
    /// Campaign name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Message template.
    pub message_template: Option<String>,
    /// Subject line (Email only).
    pub subject: Option<String>,
    /// Window start.
    pub start_date: Option<DateTime<Utc>>,
    /// Window end.
    pub end_date: Option<DateTime<Utc>>,
    /// Lead time for date-relative triggers.
    pub days_before_trigger: Option<i32>,
    /// Discount code.
    pub discount_code: Option<String>,
    /// Discount percentage.
    pub discount_percentage: Option<f64>,
    /// Re-send suppression policy.
    pub skip_if_already_sent: Option<bool>,
}
