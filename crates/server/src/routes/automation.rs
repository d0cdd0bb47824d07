//! Automation route handlers: trigger sweeps and transport status.

use axum::{Json, Router, extract::State, routing::{get, post}};
use chrono::Utc;
use serde::Serialize;

use crate::error::AppError;
use crate::services::channels::{GatewayCredentials, email::EmailSettings};
use crate::state::AppState;

/// Build the automation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/automation/run", post(run_sweep))
        .route("/automation/credentials", get(credentials_status))
}

/// Response for a sweep invocation.
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub success: bool,
    pub message: String,
}

/// Configuration status of the message transports. Booleans only - the
/// values themselves are never exposed here.
#[derive(Debug, Serialize)]
pub struct CredentialsStatus {
    pub gateway: GatewayStatus,
    pub email: EmailStatus,
}

#[derive(Debug, Serialize)]
pub struct GatewayStatus {
    pub configured: bool,
    pub sms_sender: bool,
    pub whatsapp_sender: bool,
}

#[derive(Debug, Serialize)]
pub struct EmailStatus {
    pub configured: bool,
    pub from_email: Option<String>,
}

/// Run one automated-trigger sweep.
///
/// In production this is called by an external scheduler (cron hitting the
/// endpoint, or the CLI `sweep` command).
///
/// # Errors
///
/// Returns an error if the campaign listing fails; per-campaign dispatch
/// failures are absorbed into the sweep.
pub async fn run_sweep(State(state): State<AppState>) -> Result<Json<SweepResponse>, AppError> {
    let summary = state.scanner().scan(Utc::now()).await?;
    Ok(Json(SweepResponse {
        success: true,
        message: format!(
            "checked {} campaigns, dispatched {}: {} sent, {} failed",
            summary.campaigns_checked,
            summary.campaigns_dispatched,
            summary.messages_sent,
            summary.messages_failed
        ),
    }))
}

/// Report which message transports are configured, so operators can tell
/// "not wired up" from "wired up but broken".
pub async fn credentials_status(State(state): State<AppState>) -> Json<CredentialsStatus> {
    let gateway = GatewayCredentials::resolve(state.settings()).await;
    let email = EmailSettings::resolve(state.settings()).await;

    Json(CredentialsStatus {
        gateway: GatewayStatus {
            configured: gateway.is_some(),
            sms_sender: gateway
                .as_ref()
                .is_some_and(|g| !g.sms_sender.is_empty()),
            whatsapp_sender: gateway
                .as_ref()
                .is_some_and(|g| !g.whatsapp_sender.is_empty()),
        },
        email: EmailStatus {
            configured: email.is_some(),
            from_email: email.map(|e| e.from_email),
        },
    })
}
