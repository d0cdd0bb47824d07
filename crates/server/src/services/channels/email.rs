//! Email channel adapter.
//!
//! Uses SMTP via lettre. The rendered plain-text body is wrapped in a minimal
//! HTML envelope and sent as a multipart/alternative message so clients can
//! pick either representation.

use std::time::Duration;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};

use storeline_core::Channel;

use crate::models::Customer;
use crate::services::settings::SettingsProvider;

use super::{DispatchResult, Outlet, RenderedMessage};

/// Settings keys for the SMTP transport.
pub const SMTP_HOST_KEY: &str = "SMTP_HOST";
pub const SMTP_PORT_KEY: &str = "SMTP_PORT";
pub const SMTP_USERNAME_KEY: &str = "SMTP_USERNAME";
pub const SMTP_PASSWORD_KEY: &str = "SMTP_PASSWORD";
pub const FROM_EMAIL_KEY: &str = "SMTP_FROM_EMAIL";
pub const FROM_NAME_KEY: &str = "SMTP_FROM_NAME";

const DEFAULT_FROM_EMAIL: &str = "noreply@storeline.app";
const DEFAULT_FROM_NAME: &str = "Storeline";

const SMTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Resolved SMTP settings for one dispatch run.
#[derive(Clone)]
pub struct EmailSettings {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port.
    pub smtp_port: u16,
    /// SMTP authentication username.
    pub smtp_username: String,
    /// SMTP authentication password.
    pub smtp_password: SecretString,
    /// Sender address (From header).
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish()
    }
}

impl EmailSettings {
    /// Resolve SMTP settings through the configuration provider.
    ///
    /// Returns `None` when host, username or password is absent; the outlet
    /// then reports every attempt as not-configured.
    pub async fn resolve(settings: &SettingsProvider) -> Option<Self> {
        let smtp_host = settings.get_optional(SMTP_HOST_KEY).await?;
        let smtp_username = settings.get_optional(SMTP_USERNAME_KEY).await?;
        let smtp_password = settings.get_optional(SMTP_PASSWORD_KEY).await?;
        let smtp_port = settings
            .get(SMTP_PORT_KEY, "587")
            .await
            .parse::<u16>()
            .unwrap_or(587);

        Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password: SecretString::from(smtp_password),
            from_email: settings.get(FROM_EMAIL_KEY, DEFAULT_FROM_EMAIL).await,
            from_name: settings.get(FROM_NAME_KEY, DEFAULT_FROM_NAME).await,
        })
    }
}

struct EmailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
}

/// Sends campaign messages by email.
pub struct EmailOutlet {
    transport: Option<EmailTransport>,
}

impl EmailOutlet {
    /// Create an outlet from resolved SMTP settings. Settings that fail to
    /// produce a working transport degrade to not-configured.
    #[must_use]
    pub fn new(settings: Option<EmailSettings>) -> Self {
        let transport = settings.and_then(|settings| match build_transport(&settings) {
            Ok(transport) => Some(transport),
            Err(detail) => {
                warn!(detail, "email transport unavailable, outlet will report not-configured");
                None
            }
        });
        Self { transport }
    }
}

fn build_transport(settings: &EmailSettings) -> Result<EmailTransport, String> {
    let from_mailbox: Mailbox = format!("{} <{}>", settings.from_name, settings.from_email)
        .parse()
        .map_err(|e| format!("invalid sender address: {e}"))?;

    let credentials = Credentials::new(
        settings.smtp_username.clone(),
        settings.smtp_password.expose_secret().to_string(),
    );

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
        .map_err(|e| format!("SMTP relay setup failed: {e}"))?
        .port(settings.smtp_port)
        .credentials(credentials)
        .timeout(Some(SMTP_TIMEOUT))
        .build();

    Ok(EmailTransport {
        mailer,
        from_mailbox,
    })
}

impl Outlet for EmailOutlet {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn deliver(&self, customer: &Customer, message: &RenderedMessage) -> DispatchResult {
        let channel = self.channel();

        let Some(to_email) = customer.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            return DispatchResult::missing_contact(channel, "email");
        };

        let Some(transport) = &self.transport else {
            debug!(customer_id = %customer.id, "email transport not configured, send skipped");
            return DispatchResult::not_configured(
                channel,
                "email gateway not configured".to_string(),
            );
        };

        let to_mailbox: Mailbox = match to_email.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                return DispatchResult::failed(channel, format!("invalid email address: {e}"));
            }
        };

        let subject = message.subject.clone().unwrap_or_default();
        let html_body = html_envelope(&subject, &message.body);

        let email = Message::builder()
            .from(transport.from_mailbox.clone())
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            );

        let email = match email {
            Ok(email) => email,
            Err(e) => {
                return DispatchResult::failed(channel, format!("failed to build message: {e}"));
            }
        };

        match transport.mailer.send(email).await {
            Ok(response) if response.is_positive() => {
                info!(customer_id = %customer.id, code = %response.code(), "Email sent");
                DispatchResult::sent(channel, None)
            }
            Ok(response) => {
                error!(customer_id = %customer.id, code = %response.code(), "SMTP rejected message");
                DispatchResult::failed(
                    channel,
                    format!("SMTP rejected message: {}", response.code()),
                )
            }
            Err(e) => {
                error!(customer_id = %customer.id, error = %e, "Email send failed");
                DispatchResult::failed(channel, e.to_string())
            }
        }
    }
}

/// Wrap a rendered plain-text body in the minimal HTML envelope used for
/// campaign emails.
fn html_envelope(title: &str, body: &str) -> String {
    let title = escape_html(title);
    let body = escape_html(body).replace('\n', "<br>\n");
    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; padding: 20px;">
  <div style="max-width: 600px; margin: 0 auto;">
    <h2 style="color: #333;">{title}</h2>
    <div style="white-space: pre-wrap; line-height: 1.6;">{body}</div>
    <hr style="margin: 30px 0; border: none; border-top: 1px solid #ddd;">
    <p style="color: #666; font-size: 12px;">
      You received this email because you are a valued customer.
    </p>
  </div>
</body>
</html>"#
    )
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use storeline_core::{CustomerId, StoreId};

    use super::super::DispatchOutcome;
    use super::*;

    fn customer(email: Option<&str>) -> Customer {
        Customer {
            id: CustomerId::new(3),
            store_id: StoreId::new(1),
            name: "Meera".to_string(),
            phone: None,
            email: email.map(str::to_string),
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
    async fn test_missing_email_fails_without_network() {
        let outlet = EmailOutlet::new(None);
        let message = RenderedMessage {
            subject: Some("Hello".to_string()),
            body: "Hi Meera".to_string(),
        };
        let result = outlet.deliver(&customer(None), &message).await;
        assert_eq!(result.outcome, DispatchOutcome::MissingContact { field: "email" });
        assert_eq!(result.error_detail(), Some("missing email".to_string()));
    }

    #[tokio::test]
    async fn test_unconfigured_transport_reports_demo_mode() {
        let outlet = EmailOutlet::new(None);
        let message = RenderedMessage {
            subject: Some("Hello".to_string()),
            body: "Hi Meera".to_string(),
        };
        let result = outlet
            .deliver(&customer(Some("meera@example.com")), &message)
            .await;
        assert!(result.is_not_configured());
    }

    #[test]
    fn test_html_envelope_contains_title_and_body() {
        let html = html_envelope("March Offers", "Line one\nLine two");
        assert!(html.contains("<h2 style=\"color: #333;\">March Offers</h2>"));
        assert!(html.contains("Line one<br>\nLine two"));
    }

    #[test]
    fn test_html_envelope_escapes_markup() {
        let html = html_envelope("<script>", "1 < 2 & 3 > 2");
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("1 &lt; 2 &amp; 3 &gt; 2"));
        assert!(!html.contains("<script>"));
    }
}
