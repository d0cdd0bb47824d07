//! Unified error handling for the API surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::dispatcher::DispatchError;

/// Application-level error type for API handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with current state (illegal transition, run in flight).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => Self::Database(e),
            RepositoryError::NotFound => Self::NotFound("resource not found".to_string()),
            RepositoryError::Conflict(detail) => Self::BadRequest(detail),
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::CampaignNotFound(id) => Self::NotFound(format!("campaign {id}")),
            DispatchError::CustomerNotFound(id) => Self::NotFound(format!("customer {id}")),
            // Matches the run-level precondition contract: an empty recipient
            // set fails the whole call.
            DispatchError::NoRecipients => Self::BadRequest("No customers found".to_string()),
            err @ (DispatchError::NotDispatchable { .. } | DispatchError::RunInProgress(_)) => {
                Self::Conflict(err.to_string())
            }
            DispatchError::Repository(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use storeline_core::{CampaignId, CampaignStatus};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("campaign 123".to_string());
        assert_eq!(err.to_string(), "Not found: campaign 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_dispatch_error_mapping() {
        let err: AppError = DispatchError::CampaignNotFound(CampaignId::new(9)).into();
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);

        let err: AppError = DispatchError::NoRecipients.into();
        assert_eq!(err.to_string(), "Bad request: No customers found");

        let err: AppError = DispatchError::NotDispatchable {
            id: CampaignId::new(9),
            status: CampaignStatus::Draft,
        }
        .into();
        assert_eq!(get_status(err), StatusCode::CONFLICT);

        let err: AppError = DispatchError::RunInProgress(CampaignId::new(9)).into();
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }
}
