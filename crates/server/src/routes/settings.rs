//! System settings route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::AppError;
use crate::state::AppState;

/// Key fragments whose values are masked in listings.
const SECRET_FRAGMENTS: &[&str] = &["TOKEN", "PASSWORD", "SECRET", "KEY", "SID"];

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list_settings))
        .route("/settings/{key}", axum::routing::put(put_setting))
}

/// A setting as exposed over the API. Secret-looking values are masked.
#[derive(Debug, Serialize)]
pub struct SettingView {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub group: String,
}

/// Request body for upserting a setting.
#[derive(Debug, Deserialize)]
pub struct PutSettingRequest {
    /// New value.
    pub value: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional group (defaults to "general" on first insert).
    pub group: Option<String>,
}

fn is_secret_key(key: &str) -> bool {
    let upper = key.to_uppercase();
    SECRET_FRAGMENTS.iter().any(|f| upper.contains(f))
}

/// List all settings. Secret-looking values are masked; use the environment
/// or the settings table directly to inspect them.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_settings(
    State(state): State<AppState>,
) -> Result<Json<Vec<SettingView>>, AppError> {
    let settings = db::settings::list_settings(state.pool()).await?;
    let views = settings
        .into_iter()
        .map(|s| SettingView {
            value: if is_secret_key(&s.key) {
                "********".to_string()
            } else {
                s.value
            },
            key: s.key,
            description: s.description,
            group: s.group_name,
        })
        .collect();
    Ok(Json(views))
}

/// Upsert a setting.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<PutSettingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if key.trim().is_empty() {
        return Err(AppError::BadRequest("setting key is required".to_string()));
    }
    db::settings::set_setting(
        state.pool(),
        &key,
        &request.value,
        request.description.as_deref(),
        request.group.as_deref(),
    )
    .await?;
    Ok(Json(serde_json::json!({ "success": true, "key": key })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_detection() {
        assert!(is_secret_key("GATEWAY_AUTH_TOKEN"));
        assert!(is_secret_key("SMTP_PASSWORD"));
        assert!(is_secret_key("GATEWAY_ACCOUNT_SID"));
        assert!(!is_secret_key("SMS_DEFAULT_COUNTRY_CODE"));
        assert!(!is_secret_key("SMTP_FROM_NAME"));
    }
}
