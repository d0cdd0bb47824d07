//! Campaign dispatch: recipient selection, per-recipient send with failure
//! isolation, audit trail, and counter updates.
//!
//! A dispatch run renders and delivers one message per recipient; a failure
//! for one recipient never aborts the others. All audit rows and the
//! campaign's counter update commit together in a single finalization
//! transaction at the end of the run, so a crash mid-loop leaves no partial
//! record of the run.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use storeline_core::{CampaignId, CampaignStatus, CustomerId};

use crate::db::{self, RepositoryError};
use crate::models::{Campaign, Customer, DeliveryStatus, NewCampaignLog};
use crate::services::channels::{ChannelOutlet, DispatchResult, Outlet, RenderedMessage};
use crate::services::settings::SettingsProvider;
use crate::services::template;

/// Upper bound on recipients per run when no explicit list is given.
const MAX_FAN_OUT: i64 = 1000;

/// Bound on one recipient's send, on top of the transports' own timeouts.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that fail a whole dispatch run. Per-recipient problems are not
/// errors; they land in the audit trail and the run report instead.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The campaign does not exist.
    #[error("campaign {0} not found")]
    CampaignNotFound(CampaignId),

    /// The customer does not exist in the campaign's store.
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    /// The resolved recipient set is empty.
    #[error("no customers found")]
    NoRecipients,

    /// The campaign's status does not allow dispatch.
    #[error("campaign {id} is {status} and cannot be dispatched")]
    NotDispatchable {
        /// Campaign that was refused.
        id: CampaignId,
        /// Its current status.
        status: CampaignStatus,
    },

    /// Another run for the same campaign is still in flight.
    #[error("a dispatch run for campaign {0} is already in progress")]
    RunInProgress(CampaignId),

    /// Database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One recipient's failure, as reported in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RecipientFailure {
    /// Recipient that failed.
    pub customer_id: CustomerId,
    /// Recipient's name.
    pub customer_name: String,
    /// Error detail, matching the audit entry.
    pub error: String,
}

/// Summary of one dispatch run, returned to the caller. Ephemeral - the
/// durable record is the audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRunReport {
    /// Identifier for this run (for log correlation; not persisted).
    pub run_id: Uuid,
    /// Campaign that ran.
    pub campaign_id: CampaignId,
    /// Campaign name.
    pub campaign_name: String,
    /// Recipients attempted.
    pub total: usize,
    /// Successful sends.
    pub sent: usize,
    /// Failed sends.
    pub failed: usize,
    /// Per-recipient failure details.
    pub errors: Vec<RecipientFailure>,
}

/// Outcome of the per-recipient pipeline for one customer.
#[derive(Debug)]
pub(crate) struct RecipientAttempt {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub rendered_message: String,
    pub result: DispatchResult,
}

/// Executes campaigns: selects recipients, renders, dispatches, audits.
#[derive(Clone)]
pub struct CampaignDispatcher {
    pool: PgPool,
    settings: SettingsProvider,
    in_flight: Arc<Mutex<HashSet<CampaignId>>>,
}

/// Releases the per-campaign run claim when the run ends, however it ends.
struct RunGuard {
    in_flight: Arc<Mutex<HashSet<CampaignId>>>,
    campaign_id: CampaignId,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.campaign_id);
    }
}

impl CampaignDispatcher {
    /// Create a dispatcher.
    #[must_use]
    pub fn new(pool: PgPool, settings: SettingsProvider) -> Self {
        Self {
            pool,
            settings,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Execute a campaign against its resolved recipient set.
    ///
    /// With `recipient_ids`, exactly those customers are fetched, scoped to
    /// the campaign's store (cross-store IDs are silently excluded). Without,
    /// all customers of the store are fetched, capped at 1000. Re-invoking
    /// for the same campaign and customers produces new, independent audit
    /// entries - there is no automatic deduplication unless the campaign's
    /// `skip_if_already_sent` flag is set.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] for run-level failures: unknown campaign, a
    /// status that forbids dispatch, an empty recipient set, a concurrent run
    /// for the same campaign, or a database failure (including a failed
    /// finalization commit, which leaves no partial record).
    #[instrument(skip(self, recipient_ids), fields(campaign_id = %campaign_id))]
    pub async fn execute(
        &self,
        campaign_id: CampaignId,
        recipient_ids: Option<Vec<CustomerId>>,
    ) -> Result<DispatchRunReport, DispatchError> {
        let _guard = self.claim_run(campaign_id)?;

        let campaign = db::campaigns::get_campaign(&self.pool, campaign_id)
            .await?
            .ok_or(DispatchError::CampaignNotFound(campaign_id))?;

        if !campaign.status.is_dispatchable() {
            return Err(DispatchError::NotDispatchable {
                id: campaign_id,
                status: campaign.status,
            });
        }

        let mut recipients = db::customers::fetch_recipients(
            &self.pool,
            campaign.store_id,
            recipient_ids.as_deref(),
            MAX_FAN_OUT,
        )
        .await?;

        if campaign.skip_if_already_sent {
            let already: HashSet<CustomerId> =
                db::campaign_logs::customers_already_sent(&self.pool, campaign.id, campaign.start_date)
                    .await?
                    .into_iter()
                    .collect();
            let before = recipients.len();
            recipients.retain(|customer| !already.contains(&customer.id));
            if before > recipients.len() {
                debug!(
                    skipped = before - recipients.len(),
                    "recipients skipped due to prior successful sends"
                );
            }
        }

        if recipients.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        let outlet = ChannelOutlet::for_channel(campaign.channel, &self.settings).await;
        let attempts = run_batch(&campaign, &recipients, &outlet).await;

        let report = self.finalize(&campaign, &attempts).await?;
        info!(
            run_id = %report.run_id,
            total = report.total,
            sent = report.sent,
            failed = report.failed,
            "Campaign executed"
        );
        Ok(report)
    }

    /// Send a campaign message to exactly one customer, as a preview.
    ///
    /// Writes one audit entry but does not touch the campaign's cumulative
    /// counters or status, so previews never pollute campaign statistics.
    /// Works in any campaign status, including `Draft`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if the campaign or customer cannot be
    /// resolved, or the audit insert fails.
    #[instrument(skip(self), fields(campaign_id = %campaign_id, customer_id = %customer_id))]
    pub async fn test_send(
        &self,
        campaign_id: CampaignId,
        customer_id: CustomerId,
    ) -> Result<DispatchResult, DispatchError> {
        let campaign = db::campaigns::get_campaign(&self.pool, campaign_id)
            .await?
            .ok_or(DispatchError::CampaignNotFound(campaign_id))?;

        let customer =
            db::customers::get_customer_in_store(&self.pool, customer_id, campaign.store_id)
                .await?
                .ok_or(DispatchError::CustomerNotFound(customer_id))?;

        let outlet = ChannelOutlet::for_channel(campaign.channel, &self.settings).await;
        let attempt = send_one(&campaign, &customer, &outlet).await;

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;
        db::campaign_logs::insert_log(&mut conn, &audit_entry(&campaign, &attempt)).await?;

        Ok(attempt.result)
    }

    fn claim_run(&self, campaign_id: CampaignId) -> Result<RunGuard, DispatchError> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(campaign_id) {
            return Err(DispatchError::RunInProgress(campaign_id));
        }
        Ok(RunGuard {
            in_flight: Arc::clone(&self.in_flight),
            campaign_id,
        })
    }

    /// Commit the run: every audit row plus the campaign's counter update in
    /// one transaction. All-or-nothing; on error nothing of the run is
    /// recorded.
    async fn finalize(
        &self,
        campaign: &Campaign,
        attempts: &[RecipientAttempt],
    ) -> Result<DispatchRunReport, DispatchError> {
        let mut sent = 0usize;
        let mut errors = Vec::new();
        for attempt in attempts {
            if attempt.result.success() {
                sent += 1;
            } else {
                errors.push(RecipientFailure {
                    customer_id: attempt.customer_id,
                    customer_name: attempt.customer_name.clone(),
                    error: attempt
                        .result
                        .error_detail()
                        .unwrap_or_else(|| "unknown error".to_string()),
                });
            }
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;
        for attempt in attempts {
            db::campaign_logs::insert_log(&mut tx, &audit_entry(campaign, attempt)).await?;
        }
        db::campaigns::apply_run_results(
            &mut tx,
            campaign.id,
            i32::try_from(sent).unwrap_or(i32::MAX),
        )
        .await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(DispatchRunReport {
            run_id: Uuid::new_v4(),
            campaign_id: campaign.id,
            campaign_name: campaign.name.clone(),
            total: attempts.len(),
            sent,
            failed: errors.len(),
            errors,
        })
    }
}

/// Build the audit entry for one attempt.
fn audit_entry(campaign: &Campaign, attempt: &RecipientAttempt) -> NewCampaignLog {
    NewCampaignLog {
        campaign_id: campaign.id,
        customer_id: attempt.customer_id,
        message_sent: attempt.rendered_message.clone(),
        status: if attempt.result.success() {
            DeliveryStatus::Sent
        } else {
            DeliveryStatus::Failed
        },
        channel: attempt.result.channel.display_name().to_string(),
        error_message: attempt.result.error_detail(),
    }
}

/// Run the per-recipient pipeline for one customer: render, deliver, record.
pub(crate) async fn send_one<O: Outlet>(
    campaign: &Campaign,
    customer: &Customer,
    outlet: &O,
) -> RecipientAttempt {
    let body = template::render(&campaign.message_template, customer, Some(campaign), &[]);
    let subject_template = campaign.subject.as_deref().unwrap_or(&campaign.name);
    let subject = template::render(subject_template, customer, Some(campaign), &[]);
    let rendered = RenderedMessage {
        subject: Some(subject),
        body: body.clone(),
    };

    let result = match tokio::time::timeout(SEND_TIMEOUT, outlet.deliver(customer, &rendered)).await
    {
        Ok(result) => result,
        Err(_) => DispatchResult::failed(
            outlet.channel(),
            format!("send timed out after {}s", SEND_TIMEOUT.as_secs()),
        ),
    };

    if let Some(error) = result.error_detail() {
        warn!(customer_id = %customer.id, error, "send attempt failed");
    }

    RecipientAttempt {
        customer_id: customer.id,
        customer_name: customer.name.clone(),
        rendered_message: body,
        result,
    }
}

/// Run the pipeline for every recipient in turn. One failing recipient never
/// affects the others.
pub(crate) async fn run_batch<O: Outlet>(
    campaign: &Campaign,
    recipients: &[Customer],
    outlet: &O,
) -> Vec<RecipientAttempt> {
    let mut attempts = Vec::with_capacity(recipients.len());
    for customer in recipients {
        attempts.push(send_one(campaign, customer, outlet).await);
    }
    attempts
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use storeline_core::{Channel, StoreId, TriggerKind};

    use crate::services::channels::DispatchOutcome;

    use super::*;

    /// Delivers like an SMS transport would, without any I/O: fails recipients
    /// that lack a phone, succeeds for the rest.
    struct StubSmsOutlet;

    impl Outlet for StubSmsOutlet {
        fn channel(&self) -> Channel {
            Channel::Sms
        }

        async fn deliver(&self, customer: &Customer, _message: &RenderedMessage) -> DispatchResult {
            match customer.phone.as_deref().filter(|p| !p.trim().is_empty()) {
                Some(_) => DispatchResult::sent(self.channel(), Some("SM-stub".to_string())),
                None => DispatchResult::missing_contact(self.channel(), "phone"),
            }
        }
    }

    fn campaign() -> Campaign {
        Campaign {
            id: CampaignId::new(1),
            store_id: StoreId::new(1),
            name: "Test Campaign".to_string(),
            description: None,
            channel: Channel::Sms,
            trigger_kind: TriggerKind::Manual,
            status: CampaignStatus::Active,
            message_template: "Hi {name}!".to_string(),
            subject: None,
            start_date: None,
            end_date: None,
            days_before_trigger: None,
            discount_code: None,
            discount_percentage: None,
            skip_if_already_sent: false,
            total_sent: 0,
            total_opened: 0,
            total_clicked: 0,
            total_converted: 0,
            revenue: Decimal::ZERO,
            last_run_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn customer(id: i32, name: &str, phone: Option<&str>) -> Customer {
        Customer {
            id: CustomerId::new(id),
            store_id: StoreId::new(1),
            name: name.to_string(),
            phone: phone.map(str::to_string),
            email: None,
            address: None,
            date_of_birth: None,
            last_purchase_date: None,
            total_purchases: Decimal::ZERO,
            loyalty_points: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_failure_isolation_one_attempt_per_recipient() {
        // Five recipients, two without phones: every recipient gets exactly
        // one attempt and the two failures do not abort the other three.
        let campaign = campaign();
        let recipients = vec![
            customer(1, "A", Some("9990001111")),
            customer(2, "B", None),
            customer(3, "C", Some("9990002222")),
            customer(4, "D", None),
            customer(5, "E", Some("9990003333")),
        ];

        let attempts = run_batch(&campaign, &recipients, &StubSmsOutlet).await;
        assert_eq!(attempts.len(), 5);

        let sent = attempts.iter().filter(|a| a.result.success()).count();
        let failed = attempts.iter().filter(|a| !a.result.success()).count();
        assert_eq!(sent, 3);
        assert_eq!(failed, 2);

        // Attempts stay in recipient order and carry the per-recipient render.
        assert_eq!(attempts[0].rendered_message, "Hi A!");
        assert_eq!(attempts[1].rendered_message, "Hi B!");
        assert_eq!(
            attempts[1].result.outcome,
            DispatchOutcome::MissingContact { field: "phone" }
        );
    }

    #[tokio::test]
    async fn test_audit_entries_match_attempts() {
        let campaign = campaign();
        let recipients = vec![
            customer(1, "A", Some("9990001111")),
            customer(2, "B", None),
        ];
        let attempts = run_batch(&campaign, &recipients, &StubSmsOutlet).await;

        let entries: Vec<NewCampaignLog> = attempts
            .iter()
            .map(|attempt| audit_entry(&campaign, attempt))
            .collect();

        assert_eq!(entries[0].status, DeliveryStatus::Sent);
        assert_eq!(entries[0].error_message, None);
        assert_eq!(entries[0].channel, "SMS");
        assert_eq!(entries[0].message_sent, "Hi A!");

        assert_eq!(entries[1].status, DeliveryStatus::Failed);
        assert_eq!(entries[1].error_message, Some("missing phone".to_string()));
    }

    #[tokio::test]
    async fn test_send_one_renders_per_recipient() {
        let campaign = campaign();
        let attempt = send_one(&campaign, &customer(1, "A", Some("9990001111")), &StubSmsOutlet).await;
        assert!(attempt.result.success());
        // Rendered body used the template; name substituted.
        assert_eq!(attempt.rendered_message, "Hi A!");
    }

    #[test]
    fn test_run_guard_releases_on_drop() {
        let dispatcher_set = Arc::new(Mutex::new(HashSet::new()));
        let id = CampaignId::new(7);
        {
            let mut set = dispatcher_set.lock().expect("lock");
            set.insert(id);
        }
        {
            let _guard = RunGuard {
                in_flight: Arc::clone(&dispatcher_set),
                campaign_id: id,
            };
        }
        assert!(!dispatcher_set.lock().expect("lock").contains(&id));
    }

    #[test]
    fn test_not_dispatchable_error_names_status() {
        let err = DispatchError::NotDispatchable {
            id: CampaignId::new(3),
            status: CampaignStatus::Draft,
        };
        assert_eq!(err.to_string(), "campaign 3 is draft and cannot be dispatched");
    }
}
