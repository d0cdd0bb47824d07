//! Sale route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use storeline_core::SaleId;

use crate::db;
use crate::error::AppError;
use crate::models::{CreateSaleInput, Sale, SaleWithItems};
use crate::state::AppState;

/// Build the sales router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", post(record_sale))
        .route("/sales/{id}", get(get_sale))
}

/// Record a sale.
///
/// Updates the customer's `last_purchase_date` and `total_purchases` in the
/// same transaction, which feeds the no-purchase and warranty-expiry
/// triggers.
///
/// # Errors
///
/// Returns 400 for a sale without items, or a database error.
pub async fn record_sale(
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    let sale = db::sales::record_sale(state.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Get one sale with its line items.
///
/// # Errors
///
/// Returns 404 if the sale does not exist.
pub async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<SaleId>,
) -> Result<Json<SaleWithItems>, AppError> {
    let sale = db::sales::get_sale(state.pool(), sale_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sale {sale_id}")))?;
    Ok(Json(sale))
}
