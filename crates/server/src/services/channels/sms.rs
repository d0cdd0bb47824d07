//! SMS channel adapter.

use tracing::{debug, error, info};

use storeline_core::{Channel, PhoneNumber};

use crate::models::Customer;

use super::gateway::GatewayClient;
use super::{DispatchResult, Outlet, RenderedMessage};

/// Sends campaign messages as SMS through the phone gateway.
pub struct SmsOutlet {
    gateway: Option<GatewayClient>,
}

impl SmsOutlet {
    /// Create an outlet. Without a gateway client every attempt reports
    /// not-configured instead of touching the network.
    #[must_use]
    pub const fn new(gateway: Option<GatewayClient>) -> Self {
        Self { gateway }
    }
}

impl Outlet for SmsOutlet {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn deliver(&self, customer: &Customer, message: &RenderedMessage) -> DispatchResult {
        let channel = self.channel();

        let Some(raw_phone) = customer.phone.as_deref().filter(|p| !p.trim().is_empty()) else {
            return DispatchResult::missing_contact(channel, "phone");
        };

        let Some(gateway) = &self.gateway else {
            debug!(customer_id = %customer.id, "SMS gateway not configured, send skipped");
            return DispatchResult::not_configured(
                channel,
                "SMS gateway not configured".to_string(),
            );
        };

        let credentials = gateway.credentials();
        if credentials.sms_sender.is_empty() {
            return DispatchResult::not_configured(
                channel,
                "SMS sender number not configured".to_string(),
            );
        }

        let phone = match PhoneNumber::normalize(raw_phone, &credentials.default_country_code) {
            Ok(phone) => phone,
            Err(e) => {
                return DispatchResult::failed(channel, format!("invalid phone number: {e}"));
            }
        };

        match gateway
            .send_message(&credentials.sms_sender, phone.as_str(), &message.body)
            .await
        {
            Ok(receipt) => {
                info!(
                    customer_id = %customer.id,
                    provider_id = ?receipt.provider_id,
                    "SMS sent"
                );
                DispatchResult::sent(channel, receipt.provider_id)
            }
            Err(e) => {
                error!(customer_id = %customer.id, error = %e, "SMS send failed");
                DispatchResult::failed(channel, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use storeline_core::{CustomerId, StoreId};

    use super::super::DispatchOutcome;
    use super::*;

    fn customer(phone: Option<&str>) -> Customer {
        Customer {
            id: CustomerId::new(1),
            store_id: StoreId::new(1),
            name: "Asha".to_string(),
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

    fn message() -> RenderedMessage {
        RenderedMessage {
            subject: None,
            body: "Hi Asha".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_phone_fails_without_network() {
        let outlet = SmsOutlet::new(None);
        let result = outlet.deliver(&customer(None), &message()).await;
        assert_eq!(result.channel, Channel::Sms);
        assert_eq!(result.outcome, DispatchOutcome::MissingContact { field: "phone" });
        assert_eq!(result.error_detail(), Some("missing phone".to_string()));
    }

    #[tokio::test]
    async fn test_blank_phone_counts_as_missing() {
        let outlet = SmsOutlet::new(None);
        let result = outlet.deliver(&customer(Some("   ")), &message()).await;
        assert_eq!(result.outcome, DispatchOutcome::MissingContact { field: "phone" });
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_reports_demo_mode() {
        let outlet = SmsOutlet::new(None);
        let result = outlet.deliver(&customer(Some("9998887777")), &message()).await;
        assert!(!result.success());
        assert!(result.is_not_configured());
    }
}
