//! Message channel enum.

use serde::{Deserialize, Serialize};

/// Transport used to reach a customer.
///
/// A campaign is bound to exactly one channel at creation time. The channel
/// decides which contact field a recipient must have populated before a send
/// is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "campaign_channel", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Whatsapp,
    Email,
    /// In-app notification; no external transport, logged only.
    Notification,
}

impl Channel {
    /// Human-readable channel name, as recorded in the audit trail.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sms => "SMS",
            Self::Whatsapp => "WhatsApp",
            Self::Email => "Email",
            Self::Notification => "Notification",
        }
    }

    /// The contact field a recipient must have for this channel, if any.
    #[must_use]
    pub const fn required_contact_field(self) -> Option<&'static str> {
        match self {
            Self::Sms | Self::Whatsapp => Some("phone"),
            Self::Email => Some("email"),
            Self::Notification => None,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sms" => Ok(Self::Sms),
            "whatsapp" => Ok(Self::Whatsapp),
            "email" => Ok(Self::Email),
            "notification" => Ok(Self::Notification),
            _ => Err(format!("invalid channel: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_contact_field() {
        assert_eq!(Channel::Sms.required_contact_field(), Some("phone"));
        assert_eq!(Channel::Whatsapp.required_contact_field(), Some("phone"));
        assert_eq!(Channel::Email.required_contact_field(), Some("email"));
        assert_eq!(Channel::Notification.required_contact_field(), None);
    }

    #[test]
    fn test_from_str_roundtrip() {
        for (raw, channel) in [
            ("sms", Channel::Sms),
            ("whatsapp", Channel::Whatsapp),
            ("email", Channel::Email),
            ("notification", Channel::Notification),
        ] {
            assert_eq!(raw.parse::<Channel>().expect("valid channel"), channel);
        }
        assert!("carrier-pigeon".parse::<Channel>().is_err());
    }
}
