//! Database operations for customers, including the recipient-selection
//! queries used by the dispatcher and the trigger sweep.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storeline_core::{CustomerId, StoreId};

use super::RepositoryError;
use crate::models::{CreateCustomerInput, Customer, UpdateCustomerInput};

const CUSTOMER_COLUMNS: &str = "id, store_id, name, phone, email, address, date_of_birth, \
     last_purchase_date, total_purchases, loyalty_points, created_at, updated_at";

/// Create a new customer.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub async fn create_customer(
    pool: &PgPool,
    input: CreateCustomerInput,
) -> Result<Customer, RepositoryError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        r"
        INSERT INTO customers (store_id, name, phone, email, address, date_of_birth)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {CUSTOMER_COLUMNS}
        ",
    ))
    .bind(input.store_id)
    .bind(input.name)
    .bind(input.phone)
    .bind(input.email)
    .bind(input.address)
    .bind(input.date_of_birth)
    .fetch_one(pool)
    .await?;

    Ok(customer)
}

/// Get a customer by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_customer(
    pool: &PgPool,
    customer_id: CustomerId,
) -> Result<Option<Customer>, RepositoryError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        r"
        SELECT {CUSTOMER_COLUMNS}
        FROM customers
        WHERE id = $1
        ",
    ))
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

/// Get a customer by ID, scoped to a store.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_customer_in_store(
    pool: &PgPool,
    customer_id: CustomerId,
    store_id: StoreId,
) -> Result<Option<Customer>, RepositoryError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        r"
        SELECT {CUSTOMER_COLUMNS}
        FROM customers
        WHERE id = $1 AND store_id = $2
        ",
    ))
    .bind(customer_id)
    .bind(store_id)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

/// List customers of a store, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_customers(
    pool: &PgPool,
    store_id: StoreId,
) -> Result<Vec<Customer>, RepositoryError> {
    let customers = sqlx::query_as::<_, Customer>(&format!(
        r"
        SELECT {CUSTOMER_COLUMNS}
        FROM customers
        WHERE store_id = $1
        ORDER BY id
        ",
    ))
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(customers)
}

/// Update a customer. `None` fields keep their current value.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the customer does not exist.
pub async fn update_customer(
    pool: &PgPool,
    customer_id: CustomerId,
    input: UpdateCustomerInput,
) -> Result<Customer, RepositoryError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        r"
        UPDATE customers
        SET name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            email = COALESCE($4, email),
            address = COALESCE($5, address),
            date_of_birth = COALESCE($6, date_of_birth),
            loyalty_points = COALESCE($7, loyalty_points),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {CUSTOMER_COLUMNS}
        ",
    ))
    .bind(customer_id)
    .bind(input.name)
    .bind(input.phone)
    .bind(input.email)
    .bind(input.address)
    .bind(input.date_of_birth)
    .bind(input.loyalty_points)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(customer)
}

/// Delete a customer.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the customer does not exist.
pub async fn delete_customer(
    pool: &PgPool,
    customer_id: CustomerId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(customer_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Resolve the recipient set for a dispatch run.
///
/// With an explicit ID list, fetches exactly those customers that belong to
/// `store_id`; IDs from other stores are silently excluded. Without a list,
/// fetches all customers of the store capped at `cap` to bound the fan-out of
/// a single run.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn fetch_recipients(
    pool: &PgPool,
    store_id: StoreId,
    customer_ids: Option<&[CustomerId]>,
    cap: i64,
) -> Result<Vec<Customer>, RepositoryError> {
    let customers = if let Some(ids) = customer_ids {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        sqlx::query_as::<_, Customer>(&format!(
            r"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE id = ANY($1) AND store_id = $2
            ORDER BY id
            ",
        ))
        .bind(raw_ids)
        .bind(store_id)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, Customer>(&format!(
            r"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE store_id = $1
            ORDER BY id
            LIMIT $2
            ",
        ))
        .bind(store_id)
        .bind(cap)
        .fetch_all(pool)
        .await?
    };

    Ok(customers)
}

/// Customers of a store whose last purchase is older than `cutoff` (or who
/// have never purchased), capped at `cap`. Used by the no-purchase trigger.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn customers_without_purchase_since(
    pool: &PgPool,
    store_id: StoreId,
    cutoff: DateTime<Utc>,
    cap: i64,
) -> Result<Vec<Customer>, RepositoryError> {
    let customers = sqlx::query_as::<_, Customer>(&format!(
        r"
        SELECT {CUSTOMER_COLUMNS}
        FROM customers
        WHERE store_id = $1
          AND last_purchase_date IS NOT NULL
          AND last_purchase_date < $2
        ORDER BY last_purchase_date
        LIMIT $3
        ",
    ))
    .bind(store_id)
    .bind(cutoff)
    .bind(cap)
    .fetch_all(pool)
    .await?;

    Ok(customers)
}

/// Customers of a store whose birthday (month and day, year ignored) falls on
/// the given date, capped at `cap`. Used by the birthday trigger.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn customers_with_birthday_on(
    pool: &PgPool,
    store_id: StoreId,
    month: u32,
    day: u32,
    cap: i64,
) -> Result<Vec<Customer>, RepositoryError> {
    let customers = sqlx::query_as::<_, Customer>(&format!(
        r"
        SELECT {CUSTOMER_COLUMNS}
        FROM customers
        WHERE store_id = $1
          AND date_of_birth IS NOT NULL
          AND EXTRACT(MONTH FROM date_of_birth) = $2
          AND EXTRACT(DAY FROM date_of_birth) = $3
        ORDER BY id
        LIMIT $4
        ",
    ))
    .bind(store_id)
    .bind(i32::try_from(month).unwrap_or(0))
    .bind(i32::try_from(day).unwrap_or(0))
    .bind(cap)
    .fetch_all(pool)
    .await?;

    Ok(customers)
}
