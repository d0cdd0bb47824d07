//! Campaign audit trail entries.
//!
//! One row per (campaign, customer, send attempt). Append-only: rows are never
//! updated after insert. This is the sole durable record of what the
//! dispatcher did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeline_core::{CampaignId, CampaignLogId, CustomerId};

/// Outcome of one send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "delivery_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// An audit entry joined with the recipient's name, for listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CampaignLogWithCustomer {
    /// Unique log ID.
    pub id: CampaignLogId,
    /// Recipient of the attempt.
    pub customer_id: CustomerId,
    /// Recipient's name at query time.
    pub customer_name: String,
    /// The message as rendered for this recipient.
    pub message_sent: String,
    /// Whether the send succeeded.
    pub status: DeliveryStatus,
    /// Channel actually used.
    pub channel: String,
    /// Error detail; present iff `status` is `Failed`.
    pub error_message: Option<String>,
    /// When the attempt was recorded.
    pub sent_at: DateTime<Utc>,
}

/// A draft audit entry, buffered by the dispatcher until the run's
/// finalization transaction commits.
#[derive(Debug, Clone)]
pub struct NewCampaignLog {
    /// Campaign the attempt belonged to.
    pub campaign_id: CampaignId,
    /// Recipient of the attempt.
    pub customer_id: CustomerId,
    /// The message as rendered for this recipient.
    pub message_sent: String,
    /// Whether the send succeeded.
    pub status: DeliveryStatus,
    /// Channel actually used.
    pub channel: String,
    /// Error detail for failed attempts.
    pub error_message: Option<String>,
}
