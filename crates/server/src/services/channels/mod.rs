//! Channel adapters.
//!
//! One outlet per transport (SMS, WhatsApp, Email, in-app Notification)
//! behind the common [`Outlet`] trait. Adapters return [`DispatchResult`]
//! values for every outcome - transport errors are caught at the adapter
//! boundary and never propagate to the dispatcher.

pub mod email;
pub mod gateway;
pub mod notification;
pub mod sms;
pub mod whatsapp;

use storeline_core::Channel;

use crate::models::Customer;
use crate::services::settings::SettingsProvider;

pub use email::EmailOutlet;
pub use gateway::{GatewayClient, GatewayCredentials};
pub use notification::NotificationOutlet;
pub use sms::SmsOutlet;
pub use whatsapp::WhatsappOutlet;

/// A message after template rendering, ready for transport.
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    /// Subject line; used by the email outlet, ignored elsewhere.
    pub subject: Option<String>,
    /// Rendered plain-text body.
    pub body: String,
}

/// What happened to one send attempt.
///
/// The spec's per-recipient error taxonomy as a sum type:
/// `MissingContact` and `TransportFailed` are real failures;
/// `NotConfigured` is the non-fatal "demo mode" outcome that tells operators
/// the transport is not wired up (as opposed to wired up but broken).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport accepted the message.
    Sent {
        /// Provider-assigned message identifier, when the transport returns one.
        provider_id: Option<String>,
    },
    /// The recipient lacks the contact field this channel needs.
    MissingContact {
        /// The absent field ("phone" or "email").
        field: &'static str,
    },
    /// Transport credentials are absent; no send was attempted.
    NotConfigured {
        /// Operator-facing detail.
        detail: String,
    },
    /// The transport was called and failed (API error, network error, timeout).
    TransportFailed {
        /// Error detail.
        detail: String,
    },
}

/// Uniform result contract across all channel adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    /// Channel actually used.
    pub channel: Channel,
    /// Outcome of the attempt.
    pub outcome: DispatchOutcome,
}

impl DispatchResult {
    /// A successful send.
    #[must_use]
    pub const fn sent(channel: Channel, provider_id: Option<String>) -> Self {
        Self {
            channel,
            outcome: DispatchOutcome::Sent { provider_id },
        }
    }

    /// The recipient lacks `field`.
    #[must_use]
    pub const fn missing_contact(channel: Channel, field: &'static str) -> Self {
        Self {
            channel,
            outcome: DispatchOutcome::MissingContact { field },
        }
    }

    /// The transport is not configured.
    #[must_use]
    pub const fn not_configured(channel: Channel, detail: String) -> Self {
        Self {
            channel,
            outcome: DispatchOutcome::NotConfigured { detail },
        }
    }

    /// The transport was called and failed.
    #[must_use]
    pub const fn failed(channel: Channel, detail: String) -> Self {
        Self {
            channel,
            outcome: DispatchOutcome::TransportFailed { detail },
        }
    }

    /// Whether the send succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::Sent { .. })
    }

    /// Whether the transport was skipped for lack of configuration.
    #[must_use]
    pub const fn is_not_configured(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::NotConfigured { .. })
    }

    /// Error detail for unsuccessful attempts, as recorded in the audit trail.
    #[must_use]
    pub fn error_detail(&self) -> Option<String> {
        match &self.outcome {
            DispatchOutcome::Sent { .. } => None,
            DispatchOutcome::MissingContact { field } => Some(format!("missing {field}")),
            DispatchOutcome::NotConfigured { detail }
            | DispatchOutcome::TransportFailed { detail } => Some(detail.clone()),
        }
    }
}

/// Capability of delivering a rendered message to one customer.
///
/// Implemented by each channel adapter and by [`ChannelOutlet`], the enum the
/// dispatcher selects once per run from the campaign's channel.
#[allow(async_fn_in_trait)]
pub trait Outlet {
    /// Channel this outlet delivers through.
    fn channel(&self) -> Channel;

    /// Deliver a rendered message. Infallible by contract: every transport
    /// error is folded into the returned [`DispatchResult`].
    async fn deliver(&self, customer: &Customer, message: &RenderedMessage) -> DispatchResult;
}

/// The concrete outlet for a campaign's channel, built once per dispatch run
/// with a credential snapshot from the settings provider.
pub enum ChannelOutlet {
    Sms(SmsOutlet),
    Whatsapp(WhatsappOutlet),
    Email(EmailOutlet),
    Notification(NotificationOutlet),
}

impl ChannelOutlet {
    /// Build the outlet for `channel`, resolving credentials through the
    /// configuration provider.
    pub async fn for_channel(channel: Channel, settings: &SettingsProvider) -> Self {
        match channel {
            Channel::Sms => {
                let gateway = GatewayCredentials::resolve(settings)
                    .await
                    .map(GatewayClient::new);
                Self::Sms(SmsOutlet::new(gateway))
            }
            Channel::Whatsapp => {
                let gateway = GatewayCredentials::resolve(settings)
                    .await
                    .map(GatewayClient::new);
                Self::Whatsapp(WhatsappOutlet::new(gateway))
            }
            Channel::Email => {
                let config = email::EmailSettings::resolve(settings).await;
                Self::Email(EmailOutlet::new(config))
            }
            Channel::Notification => Self::Notification(NotificationOutlet),
        }
    }
}

impl Outlet for ChannelOutlet {
    fn channel(&self) -> Channel {
        match self {
            Self::Sms(outlet) => outlet.channel(),
            Self::Whatsapp(outlet) => outlet.channel(),
            Self::Email(outlet) => outlet.channel(),
            Self::Notification(outlet) => outlet.channel(),
        }
    }

    async fn deliver(&self, customer: &Customer, message: &RenderedMessage) -> DispatchResult {
        match self {
            Self::Sms(outlet) => outlet.deliver(customer, message).await,
            Self::Whatsapp(outlet) => outlet.deliver(customer, message).await,
            Self::Email(outlet) => outlet.deliver(customer, message).await,
            Self::Notification(outlet) => outlet.deliver(customer, message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_per_outcome() {
        let sent = DispatchResult::sent(Channel::Sms, Some("SM123".to_string()));
        assert!(sent.success());
        assert_eq!(sent.error_detail(), None);

        let missing = DispatchResult::missing_contact(Channel::Whatsapp, "phone");
        assert!(!missing.success());
        assert_eq!(missing.error_detail(), Some("missing phone".to_string()));

        let demo = DispatchResult::not_configured(Channel::Sms, "SMS gateway not configured".to_string());
        assert!(!demo.success());
        assert!(demo.is_not_configured());

        let failed = DispatchResult::failed(Channel::Email, "connection refused".to_string());
        assert!(!failed.success());
        assert!(!failed.is_not_configured());
        assert_eq!(failed.error_detail(), Some("connection refused".to_string()));
    }
}
