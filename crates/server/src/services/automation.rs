//! Automated campaign triggers.
//!
//! One call to [`TriggerScanner::scan`] performs one sweep over all `Active`,
//! non-manual campaigns and invokes the dispatcher for those whose trigger
//! condition holds. The scanner does not schedule itself; an external timer
//! (cron, the CLI `sweep` command) drives it.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use storeline_core::{CustomerId, TriggerKind};

use crate::db::{self, RepositoryError};
use crate::models::{Campaign, Customer};
use crate::services::dispatcher::{CampaignDispatcher, DispatchError, DispatchRunReport};

/// Fixed lookback window for the no-purchase trigger.
const NO_PURCHASE_WINDOW_DAYS: i64 = 30;

/// Default lookahead for warranty-expiry campaigns without an explicit
/// `days_before_trigger`.
const DEFAULT_WARRANTY_LOOKAHEAD_DAYS: i64 = 30;

/// Cap on recipients selected by one trigger evaluation.
const TRIGGER_RECIPIENT_CAP: i64 = 100;

/// Result of one sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    /// Automated campaigns examined.
    pub campaigns_checked: usize,
    /// Campaigns whose trigger fired and were dispatched.
    pub campaigns_dispatched: usize,
    /// Messages sent across all dispatched runs.
    pub messages_sent: usize,
    /// Messages failed across all dispatched runs.
    pub messages_failed: usize,
}

/// Evaluates trigger conditions and hands qualifying campaigns to the
/// dispatcher.
#[derive(Clone)]
pub struct TriggerScanner {
    pool: PgPool,
    dispatcher: CampaignDispatcher,
}

impl TriggerScanner {
    /// Create a scanner.
    #[must_use]
    pub const fn new(pool: PgPool, dispatcher: CampaignDispatcher) -> Self {
        Self { pool, dispatcher }
    }

    /// Perform one sweep at the given instant.
    ///
    /// A failing campaign is logged and skipped; it never aborts the sweep.
    ///
    /// # Errors
    ///
    /// Returns an error only if the initial campaign listing fails.
    #[instrument(skip(self))]
    pub async fn scan(&self, now: DateTime<Utc>) -> Result<SweepSummary, RepositoryError> {
        let campaigns = db::campaigns::list_automated_active(&self.pool).await?;
        let mut summary = SweepSummary::default();

        for campaign in campaigns {
            summary.campaigns_checked += 1;
            match self.evaluate(&campaign, now).await {
                Ok(Some(report)) => {
                    summary.campaigns_dispatched += 1;
                    summary.messages_sent += report.sent;
                    summary.messages_failed += report.failed;
                }
                Ok(None) => {}
                Err(DispatchError::NoRecipients) => {
                    debug!(campaign_id = %campaign.id, "trigger matched no recipients");
                }
                Err(e) => {
                    warn!(campaign_id = %campaign.id, error = %e, "automated dispatch failed");
                }
            }
        }

        info!(
            checked = summary.campaigns_checked,
            dispatched = summary.campaigns_dispatched,
            sent = summary.messages_sent,
            failed = summary.messages_failed,
            "Automated campaign sweep completed"
        );
        Ok(summary)
    }

    /// Evaluate one campaign's trigger. Returns `Ok(None)` when the condition
    /// does not hold right now.
    async fn evaluate(
        &self,
        campaign: &Campaign,
        now: DateTime<Utc>,
    ) -> Result<Option<DispatchRunReport>, DispatchError> {
        match campaign.trigger_kind {
            TriggerKind::NoPurchase30Days => {
                let cutoff = now - Duration::days(NO_PURCHASE_WINDOW_DAYS);
                let customers = db::customers::customers_without_purchase_since(
                    &self.pool,
                    campaign.store_id,
                    cutoff,
                    TRIGGER_RECIPIENT_CAP,
                )
                .await?;
                self.dispatch_to(campaign, customers).await
            }
            TriggerKind::Festival => match (campaign.start_date, campaign.end_date) {
                (Some(start), Some(end)) if start <= now && now <= end => {
                    self.dispatcher.execute(campaign.id, None).await.map(Some)
                }
                _ => Ok(None),
            },
            TriggerKind::Birthday => {
                let lead_days = i64::from(campaign.days_before_trigger.unwrap_or(0));
                let target = (now + Duration::days(lead_days)).date_naive();
                let customers = db::customers::customers_with_birthday_on(
                    &self.pool,
                    campaign.store_id,
                    target.month(),
                    target.day(),
                    TRIGGER_RECIPIENT_CAP,
                )
                .await?;
                self.dispatch_to(campaign, customers).await
            }
            TriggerKind::WarrantyExpiry => {
                let lead_days = campaign
                    .days_before_trigger
                    .map_or(DEFAULT_WARRANTY_LOOKAHEAD_DAYS, i64::from);
                let customers = db::sales::customers_with_warranty_expiring(
                    &self.pool,
                    campaign.store_id,
                    now,
                    now + Duration::days(lead_days),
                    TRIGGER_RECIPIENT_CAP,
                )
                .await?;
                self.dispatch_to(campaign, customers).await
            }
            kind => {
                debug!(campaign_id = %campaign.id, %kind, "trigger kind not automated, skipping");
                Ok(None)
            }
        }
    }

    async fn dispatch_to(
        &self,
        campaign: &Campaign,
        customers: Vec<Customer>,
    ) -> Result<Option<DispatchRunReport>, DispatchError> {
        if customers.is_empty() {
            return Ok(None);
        }
        let ids: Vec<CustomerId> = customers.into_iter().map(|c| c.id).collect();
        self.dispatcher.execute(campaign.id, Some(ids)).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_no_purchase_cutoff_is_thirty_days() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).single().expect("valid");
        let cutoff = now - Duration::days(NO_PURCHASE_WINDOW_DAYS);
        assert_eq!(
            cutoff,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid")
        );
    }

    #[test]
    fn test_birthday_target_respects_lead_days() {
        let now = Utc.with_ymd_and_hms(2026, 2, 26, 9, 0, 0).single().expect("valid");
        let target = (now + Duration::days(3)).date_naive();
        assert_eq!(target.month(), 3);
        assert_eq!(target.day(), 1);
    }

    #[test]
    fn test_festival_window_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).single().expect("valid");
        let end = Utc.with_ymd_and_hms(2026, 3, 12, 23, 59, 59).single().expect("valid");
        // Same comparison the festival arm performs.
        let in_window = |now: DateTime<Utc>| start <= now && now <= end;
        assert!(in_window(start));
        assert!(in_window(end));
        assert!(in_window(start + Duration::days(3)));
        assert!(!in_window(end + Duration::seconds(1)));
        assert!(!in_window(start - Duration::seconds(1)));
    }
}
