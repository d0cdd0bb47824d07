//! Customer route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use storeline_core::{CustomerId, StoreId};

use crate::db;
use crate::error::AppError;
use crate::models::{CreateCustomerInput, Customer, UpdateCustomerInput};
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Query parameters for customer listing.
#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    /// Store to list customers for.
    pub store_id: StoreId,
}

/// Create a new customer.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerInput>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("customer name is required".to_string()));
    }
    let customer = db::customers::create_customer(state.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// List customers of a store.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = db::customers::list_customers(state.pool(), query.store_id).await?;
    Ok(Json(customers))
}

/// Get one customer.
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<Customer>, AppError> {
    let customer = db::customers::get_customer(state.pool(), customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {customer_id}")))?;
    Ok(Json(customer))
}

/// Update a customer.
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Json(input): Json<UpdateCustomerInput>,
) -> Result<Json<Customer>, AppError> {
    let customer = db::customers::update_customer(state.pool(), customer_id, input).await?;
    Ok(Json(customer))
}

/// Delete a customer.
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<StatusCode, AppError> {
    db::customers::delete_customer(state.pool(), customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
