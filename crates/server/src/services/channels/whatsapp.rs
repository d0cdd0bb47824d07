//! WhatsApp channel adapter.
//!
//! WhatsApp rides the same gateway as SMS but addresses both ends with a
//! `whatsapp:` prefix on the phone identifier.

use tracing::{debug, error, info};

use storeline_core::{Channel, PhoneNumber};

use crate::models::Customer;

use super::gateway::GatewayClient;
use super::{DispatchResult, Outlet, RenderedMessage};

/// Sends campaign messages over WhatsApp through the phone gateway.
pub struct WhatsappOutlet {
    gateway: Option<GatewayClient>,
}

impl WhatsappOutlet {
    /// Create an outlet. Without a gateway client every attempt reports
    /// not-configured instead of touching the network.
    #[must_use]
    pub const fn new(gateway: Option<GatewayClient>) -> Self {
        Self { gateway }
    }
}

impl Outlet for WhatsappOutlet {
    fn channel(&self) -> Channel {
        Channel::Whatsapp
    }

    async fn deliver(&self, customer: &Customer, message: &RenderedMessage) -> DispatchResult {
        let channel = self.channel();

        let Some(raw_phone) = customer.phone.as_deref().filter(|p| !p.trim().is_empty()) else {
            return DispatchResult::missing_contact(channel, "phone");
        };

        let Some(gateway) = &self.gateway else {
            debug!(customer_id = %customer.id, "WhatsApp gateway not configured, send skipped");
            return DispatchResult::not_configured(
                channel,
                "WhatsApp gateway not configured".to_string(),
            );
        };

        let credentials = gateway.credentials();
        let phone = match PhoneNumber::normalize(raw_phone, &credentials.default_country_code) {
            Ok(phone) => phone,
            Err(e) => {
                return DispatchResult::failed(channel, format!("invalid phone number: {e}"));
            }
        };

        let sender = if credentials.whatsapp_sender.starts_with("whatsapp:") {
            credentials.whatsapp_sender.clone()
        } else {
            format!("whatsapp:{}", credentials.whatsapp_sender)
        };

        match gateway
            .send_message(&sender, &phone.whatsapp_address(), &message.body)
            .await
        {
            Ok(receipt) => {
                info!(
                    customer_id = %customer.id,
                    provider_id = ?receipt.provider_id,
                    "WhatsApp message sent"
                );
                DispatchResult::sent(channel, receipt.provider_id)
            }
            Err(e) => {
                error!(customer_id = %customer.id, error = %e, "WhatsApp send failed");
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
            id: CustomerId::new(2),
            store_id: StoreId::new(1),
            name: "Ravi".to_string(),
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
    async fn test_missing_phone_fails_without_network() {
        // A customer without a phone dispatched via WhatsApp fails with
        // "missing phone" before any transport work happens.
        let outlet = WhatsappOutlet::new(None);
        let message = RenderedMessage {
            subject: None,
            body: "Hello".to_string(),
        };
        let result = outlet.deliver(&customer(None), &message).await;
        assert!(!result.success());
        assert_eq!(result.channel, Channel::Whatsapp);
        assert_eq!(result.channel.display_name(), "WhatsApp");
        assert_eq!(result.outcome, DispatchOutcome::MissingContact { field: "phone" });
        assert_eq!(result.error_detail(), Some("missing phone".to_string()));
    }
}
