//! Store route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use storeline_core::StoreId;

use crate::db;
use crate::error::AppError;
use crate::models::{CreateStoreInput, Store};
use crate::state::AppState;

/// Build the stores router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list_stores).post(create_store))
        .route("/stores/{id}", get(get_store))
}

/// Create a new store.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub async fn create_store(
    State(state): State<AppState>,
    Json(input): Json<CreateStoreInput>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    let store = db::stores::create_store(state.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// List all active stores.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_stores(State(state): State<AppState>) -> Result<Json<Vec<Store>>, AppError> {
    let stores = db::stores::list_stores(state.pool()).await?;
    Ok(Json(stores))
}

/// Get one store.
///
/// # Errors
///
/// Returns 404 if the store does not exist.
pub async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>, AppError> {
    let store = db::stores::get_store(state.pool(), store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;
    Ok(Json(store))
}
