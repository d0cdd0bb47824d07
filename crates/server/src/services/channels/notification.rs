//! In-app notification channel adapter.
//!
//! No external transport exists for in-app notifications; the attempt is
//! recorded in the audit trail and surfaced to the application through it.

use tracing::info;

use storeline_core::Channel;

use crate::models::Customer;

use super::{DispatchResult, Outlet, RenderedMessage};

/// Records campaign messages as in-app notifications (logged only).
pub struct NotificationOutlet;

impl Outlet for NotificationOutlet {
    fn channel(&self) -> Channel {
        Channel::Notification
    }

    async fn deliver(&self, customer: &Customer, message: &RenderedMessage) -> DispatchResult {
        info!(
            customer_id = %customer.id,
            body_len = message.body.len(),
            "In-app notification recorded"
        );
        DispatchResult::sent(self.channel(), None)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use storeline_core::{CustomerId, StoreId};

    use super::*;

    #[tokio::test]
    async fn test_notification_always_succeeds() {
        let customer = Customer {
            id: CustomerId::new(4),
            store_id: StoreId::new(1),
            name: "Divya".to_string(),
            phone: None,
            email: None,
            address: None,
            date_of_birth: None,
            last_purchase_date: None,
            total_purchases: Decimal::ZERO,
            loyalty_points: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        let message = RenderedMessage {
            subject: None,
            body: "Welcome".to_string(),
        };

        let outlet = NotificationOutlet;
        let result = outlet.deliver(&customer, &message).await;
        assert!(result.success());
        assert_eq!(result.channel, Channel::Notification);
    }
}
