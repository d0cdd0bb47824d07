//! Campaign route handlers: CRUD, lifecycle transitions, execution, preview
//! sends, and the audit trail listing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use storeline_core::{CampaignId, CampaignStatus, CustomerId, StoreId};

use crate::db;
use crate::error::AppError;
use crate::models::{Campaign, CampaignLogWithCustomer, CreateCampaignInput, UpdateCampaignInput};
use crate::services::dispatcher::RecipientFailure;
use crate::state::AppState;

/// Build the campaigns router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route(
            "/campaigns/{id}",
            get(get_campaign).put(update_campaign).delete(delete_campaign),
        )
        .route("/campaigns/{id}/status", post(change_status))
        .route("/campaigns/{id}/execute", post(execute_campaign))
        .route("/campaigns/{id}/test", post(test_message))
        .route("/campaigns/{id}/logs", get(campaign_logs))
}

/// Query parameters for campaign listing.
#[derive(Debug, Deserialize)]
pub struct ListCampaignsQuery {
    /// Store to list campaigns for.
    pub store_id: StoreId,
}

/// Request body for a lifecycle transition.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// Target status.
    pub status: CampaignStatus,
}

/// Request body for campaign execution.
#[derive(Debug, Default, Deserialize)]
pub struct ExecuteCampaignRequest {
    /// Explicit recipients; when absent, all customers of the campaign's
    /// store (capped).
    #[serde(default)]
    pub customer_ids: Option<Vec<CustomerId>>,
}

/// Response for campaign execution.
#[derive(Debug, Serialize)]
pub struct ExecuteCampaignResponse {
    pub success: bool,
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<RecipientFailure>,
}

/// Request body for a preview send.
#[derive(Debug, Deserialize)]
pub struct TestMessageRequest {
    /// Customer to preview against.
    pub customer_id: CustomerId,
}

/// Response for a preview send.
#[derive(Debug, Serialize)]
pub struct TestMessageResponse {
    pub success: bool,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query parameters for the audit trail listing.
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Page size (max 200).
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

const fn default_page() -> i64 {
    1
}

const fn default_per_page() -> i64 {
    50
}

/// Response for the audit trail listing.
#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub total_logs: i64,
    pub logs: Vec<CampaignLogWithCustomer>,
}

/// Create a new campaign.
///
/// # Errors
///
/// Returns an error if validation or the database insert fails.
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(input): Json<CreateCampaignInput>,
) -> Result<(StatusCode, Json<Campaign>), AppError> {
    if input.message_template.trim().is_empty() {
        return Err(AppError::BadRequest(
            "message template is required".to_string(),
        ));
    }
    let campaign = db::campaigns::create_campaign(state.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// List campaigns of a store.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(query): Query<ListCampaignsQuery>,
) -> Result<Json<Vec<Campaign>>, AppError> {
    let campaigns = db::campaigns::list_campaigns(state.pool(), query.store_id).await?;
    Ok(Json(campaigns))
}

/// Get one campaign.
///
/// # Errors
///
/// Returns 404 if the campaign does not exist.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Json<Campaign>, AppError> {
    let campaign = db::campaigns::get_campaign(state.pool(), campaign_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("campaign {campaign_id}")))?;
    Ok(Json(campaign))
}

/// Update a campaign's editable fields.
///
/// # Errors
///
/// Returns 404 if the campaign does not exist.
pub async fn update_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
    Json(input): Json<UpdateCampaignInput>,
) -> Result<Json<Campaign>, AppError> {
    let campaign = db::campaigns::update_campaign(state.pool(), campaign_id, input).await?;
    Ok(Json(campaign))
}

/// Delete a campaign.
///
/// # Errors
///
/// Returns 404 if the campaign does not exist.
pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<StatusCode, AppError> {
    db::campaigns::delete_campaign(state.pool(), campaign_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Transition a campaign's lifecycle status.
///
/// Legal transitions: `Draft -> Scheduled -> Active <-> Paused`, and
/// `{Active, Paused} -> Completed`. `Completed` is terminal.
///
/// # Errors
///
/// Returns 409 for an illegal transition, 404 for an unknown campaign.
pub async fn change_status(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<Campaign>, AppError> {
    let campaign = db::campaigns::get_campaign(state.pool(), campaign_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("campaign {campaign_id}")))?;

    if !campaign.status.can_transition_to(request.status) {
        return Err(AppError::Conflict(format!(
            "cannot transition campaign from {} to {}",
            campaign.status, request.status
        )));
    }

    let campaign = db::campaigns::set_status(state.pool(), campaign_id, request.status).await?;
    Ok(Json(campaign))
}

/// Execute a campaign: send to the resolved recipient set.
///
/// Partial success is the expected outcome of a fan-out: the call reports
/// `success: true` with a non-zero `failed` count whenever some recipients
/// fail; only run-level preconditions fail the whole request.
///
/// # Errors
///
/// Returns 404 for an unknown campaign, 400 when no recipients resolve,
/// 409 when the campaign's status forbids dispatch or a run is in flight.
pub async fn execute_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
    Json(request): Json<ExecuteCampaignRequest>,
) -> Result<Json<ExecuteCampaignResponse>, AppError> {
    let report = state
        .dispatcher()
        .execute(campaign_id, request.customer_ids)
        .await?;

    Ok(Json(ExecuteCampaignResponse {
        success: true,
        campaign_id: report.campaign_id,
        campaign_name: report.campaign_name,
        total: report.total,
        sent: report.sent,
        failed: report.failed,
        errors: report.errors,
    }))
}

/// Send a preview message to a single customer without touching campaign
/// statistics.
///
/// # Errors
///
/// Returns 404 if the campaign or customer cannot be resolved.
pub async fn test_message(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
    Json(request): Json<TestMessageRequest>,
) -> Result<Json<TestMessageResponse>, AppError> {
    let result = state
        .dispatcher()
        .test_send(campaign_id, request.customer_id)
        .await?;

    Ok(Json(TestMessageResponse {
        success: result.success(),
        channel: result.channel.display_name().to_string(),
        error: result.error_detail(),
    }))
}

/// List a campaign's audit trail, most recent first.
///
/// # Errors
///
/// Returns 404 if the campaign does not exist.
pub async fn campaign_logs(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, AppError> {
    let campaign = db::campaigns::get_campaign(state.pool(), campaign_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("campaign {campaign_id}")))?;

    let per_page = query.per_page.clamp(1, 200);
    let page = query.page.max(1);
    let offset = (page - 1) * per_page;

    let logs = db::campaign_logs::list_logs(state.pool(), campaign_id, per_page, offset).await?;
    let total_logs = db::campaign_logs::count_logs(state.pool(), campaign_id).await?;

    Ok(Json(LogsResponse {
        campaign_id,
        campaign_name: campaign.name,
        total_logs,
        logs,
    }))
}
