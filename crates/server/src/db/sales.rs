//! Database operations for sales and the warranty query used by the trigger
//! sweep.

use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use storeline_core::{SaleId, StoreId};

use super::RepositoryError;
use crate::models::{CreateSaleInput, Customer, Sale, SaleItem, SaleWithItems};

/// Record a sale with its line items.
///
/// Runs in one transaction: inserts the sale and items, then bumps the
/// customer's `last_purchase_date` and `total_purchases` when the sale is
/// attributed to a customer.
///
/// # Errors
///
/// Returns [`RepositoryError::Conflict`] if the sale has no items, or a
/// database error if any statement fails.
pub async fn record_sale(pool: &PgPool, input: CreateSaleInput) -> Result<Sale, RepositoryError> {
    if input.items.is_empty() {
        return Err(RepositoryError::Conflict(
            "a sale must have at least one item".to_string(),
        ));
    }

    let sale_date = input.sale_date.unwrap_or_else(Utc::now);
    let total_amount: Decimal = input
        .items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum();

    let mut tx = pool.begin().await.map_err(RepositoryError::Database)?;

    let sale = sqlx::query_as::<_, Sale>(
        r"
        INSERT INTO sales (store_id, customer_id, total_amount, sale_date)
        VALUES ($1, $2, $3, $4)
        RETURNING id, store_id, customer_id, total_amount, sale_date, created_at
        ",
    )
    .bind(input.store_id)
    .bind(input.customer_id)
    .bind(total_amount)
    .bind(sale_date)
    .fetch_one(&mut *tx)
    .await?;

    for item in &input.items {
        let warranty_expires_at = item
            .warranty_months
            .and_then(|months| sale_date.checked_add_months(Months::new(months)));

        sqlx::query(
            r"
            INSERT INTO sale_items (sale_id, product_name, quantity, unit_price, warranty_expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(sale.id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(warranty_expires_at)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(customer_id) = input.customer_id {
        sqlx::query(
            r"
            UPDATE customers
            SET last_purchase_date = GREATEST(COALESCE(last_purchase_date, $2), $2),
                total_purchases = total_purchases + $3,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(customer_id)
        .bind(sale_date)
        .bind(total_amount)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await.map_err(RepositoryError::Database)?;

    Ok(sale)
}

/// Get a sale with its line items.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_sale(
    pool: &PgPool,
    sale_id: SaleId,
) -> Result<Option<SaleWithItems>, RepositoryError> {
    let sale = sqlx::query_as::<_, Sale>(
        r"
        SELECT id, store_id, customer_id, total_amount, sale_date, created_at
        FROM sales
        WHERE id = $1
        ",
    )
    .bind(sale_id)
    .fetch_optional(pool)
    .await?;

    let Some(sale) = sale else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, SaleItem>(
        r"
        SELECT id, sale_id, product_name, quantity, unit_price, warranty_expires_at
        FROM sale_items
        WHERE sale_id = $1
        ORDER BY id
        ",
    )
    .bind(sale_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(SaleWithItems { sale, items }))
}

/// Customers of a store with a sale item whose warranty expires within
/// `[from, to]`, capped at `cap`. Used by the warranty-expiry trigger.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn customers_with_warranty_expiring(
    pool: &PgPool,
    store_id: StoreId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    cap: i64,
) -> Result<Vec<Customer>, RepositoryError> {
    let customers = sqlx::query_as::<_, Customer>(
        r"
        SELECT DISTINCT
            c.id, c.store_id, c.name, c.phone, c.email, c.address, c.date_of_birth,
            c.last_purchase_date, c.total_purchases, c.loyalty_points, c.created_at,
            c.updated_at
        FROM customers c
        JOIN sales s ON s.customer_id = c.id
        JOIN sale_items i ON i.sale_id = s.id
        WHERE c.store_id = $1
          AND i.warranty_expires_at IS NOT NULL
          AND i.warranty_expires_at BETWEEN $2 AND $3
        ORDER BY c.id
        LIMIT $4
        ",
    )
    .bind(store_id)
    .bind(from)
    .bind(to)
    .bind(cap)
    .fetch_all(pool)
    .await?;

    Ok(customers)
}
