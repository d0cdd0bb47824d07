//! Database operations for stores.

use sqlx::PgPool;

use storeline_core::StoreId;

use super::RepositoryError;
use crate::models::{CreateStoreInput, Store};

/// Create a new store.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub async fn create_store(pool: &PgPool, input: CreateStoreInput) -> Result<Store, RepositoryError> {
    let store = sqlx::query_as::<_, Store>(
        r"
        INSERT INTO stores (name, address, phone, email)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, address, phone, email, is_active, created_at, updated_at
        ",
    )
    .bind(input.name)
    .bind(input.address)
    .bind(input.phone)
    .bind(input.email)
    .fetch_one(pool)
    .await?;

    Ok(store)
}

/// Get a store by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_store(pool: &PgPool, store_id: StoreId) -> Result<Option<Store>, RepositoryError> {
    let store = sqlx::query_as::<_, Store>(
        r"
        SELECT id, name, address, phone, email, is_active, created_at, updated_at
        FROM stores
        WHERE id = $1
        ",
    )
    .bind(store_id)
    .fetch_optional(pool)
    .await?;

    Ok(store)
}

/// List all active stores.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_stores(pool: &PgPool) -> Result<Vec<Store>, RepositoryError> {
    let stores = sqlx::query_as::<_, Store>(
        r"
        SELECT id, name, address, phone, email, is_active, created_at, updated_at
        FROM stores
        WHERE is_active
        ORDER BY id
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(stores)
}
