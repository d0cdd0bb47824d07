//! REST client for the phone-message gateway (SMS and WhatsApp transport).
//!
//! The gateway is a Twilio-compatible API: messages are created by POSTing a
//! form to `/Accounts/{sid}/Messages.json` with basic auth over the account
//! SID / auth token pair.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::services::settings::{SettingsProvider, looks_like_placeholder};

/// Settings keys for the gateway credential pair and sender identities.
pub const ACCOUNT_SID_KEY: &str = "GATEWAY_ACCOUNT_SID";
pub const AUTH_TOKEN_KEY: &str = "GATEWAY_AUTH_TOKEN";
pub const SMS_SENDER_KEY: &str = "GATEWAY_SMS_SENDER";
pub const WHATSAPP_SENDER_KEY: &str = "GATEWAY_WHATSAPP_SENDER";
pub const BASE_URL_KEY: &str = "GATEWAY_BASE_URL";
pub const COUNTRY_CODE_KEY: &str = "SMS_DEFAULT_COUNTRY_CODE";

const DEFAULT_BASE_URL: &str = "https://api.twilio.com/2010-04-01";
const DEFAULT_WHATSAPP_SENDER: &str = "whatsapp:+14155238886";
const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Bounded per-request timeout so a hung transport fails one recipient, not
/// the whole run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from the phone gateway. These never leave the channel adapters;
/// outlets fold them into `DispatchResult` values.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed (network, DNS, timeout).
    #[error("gateway request failed: {0}")]
    Request(String),

    /// Failed to parse the gateway response.
    #[error("gateway response error: {0}")]
    Response(String),

    /// Gateway rejected the message.
    #[error("gateway API error: {0}")]
    Api(String),
}

/// Resolved credential snapshot for one dispatch run.
#[derive(Clone)]
pub struct GatewayCredentials {
    /// API base URL.
    pub base_url: String,
    /// Account identifier.
    pub account_sid: String,
    /// Auth token paired with the account SID.
    pub auth_token: SecretString,
    /// Sender number for SMS (e.g. "+12025550123").
    pub sms_sender: String,
    /// Sender identity for WhatsApp (e.g. "whatsapp:+14155238886").
    pub whatsapp_sender: String,
    /// Country code assumed for bare national phone numbers.
    pub default_country_code: String,
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("base_url", &self.base_url)
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("sms_sender", &self.sms_sender)
            .field("whatsapp_sender", &self.whatsapp_sender)
            .field("default_country_code", &self.default_country_code)
            .finish()
    }
}

impl GatewayCredentials {
    /// Resolve a credential snapshot through the configuration provider.
    ///
    /// Returns `None` when the SID/token pair is absent; the outlets then
    /// report every attempt as not-configured without touching the network.
    pub async fn resolve(settings: &SettingsProvider) -> Option<Self> {
        let account_sid = settings.get_optional(ACCOUNT_SID_KEY).await?;
        let auth_token = settings.get_optional(AUTH_TOKEN_KEY).await?;

        if looks_like_placeholder(&auth_token) {
            warn!("{AUTH_TOKEN_KEY} looks like a placeholder value");
        }

        Some(Self {
            base_url: settings.get(BASE_URL_KEY, DEFAULT_BASE_URL).await,
            account_sid,
            auth_token: SecretString::from(auth_token),
            sms_sender: settings.get(SMS_SENDER_KEY, "").await,
            whatsapp_sender: settings
                .get(WHATSAPP_SENDER_KEY, DEFAULT_WHATSAPP_SENDER)
                .await,
            default_country_code: settings.get(COUNTRY_CODE_KEY, DEFAULT_COUNTRY_CODE).await,
        })
    }
}

/// Subset of the gateway's message-creation response we care about.
#[derive(Debug, Deserialize)]
struct GatewayMessageResponse {
    sid: Option<String>,
    status: Option<String>,
    message: Option<String>,
}

/// Receipt for an accepted message.
#[derive(Debug, Clone)]
pub struct ProviderReceipt {
    /// Provider-assigned message identifier.
    pub provider_id: Option<String>,
    /// Provider-side delivery status (e.g. "queued").
    pub status: Option<String>,
}

/// Gateway API client shared by the SMS and WhatsApp outlets.
pub struct GatewayClient {
    http: Client,
    credentials: GatewayCredentials,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Create a client from a resolved credential snapshot.
    #[must_use]
    pub fn new(credentials: GatewayCredentials) -> Self {
        Self {
            http: Client::new(),
            credentials,
        }
    }

    /// The credential snapshot this client was built with.
    #[must_use]
    pub const fn credentials(&self) -> &GatewayCredentials {
        &self.credentials
    }

    /// Create one outbound message.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails, the response cannot be
    /// parsed, or the gateway rejects the message.
    #[instrument(skip(self, body), fields(to = %to))]
    pub async fn send_message(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<ProviderReceipt, GatewayError> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.credentials.base_url, self.credentials.account_sid
        );
        let params = [("To", to), ("From", from), ("Body", body)];

        let response = self
            .http
            .post(&url)
            .basic_auth(
                &self.credentials.account_sid,
                Some(self.credentials.auth_token.expose_secret()),
            )
            .form(&params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        let payload: GatewayMessageResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Response(e.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::Api(payload.message.unwrap_or_else(|| {
                format!("gateway returned HTTP {status}")
            })));
        }

        debug!(
            sid = ?payload.sid,
            status = ?payload.status,
            "Message accepted by gateway"
        );

        Ok(ProviderReceipt {
            provider_id: payload.sid,
            status: payload.status,
        })
    }
}
