//! System settings storage.
//!
//! The persisted half of the configuration provider chain
//! (settings table -> process environment -> default).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::RepositoryError;

/// A persisted system setting.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct SystemSetting {
    /// Setting key (unique).
    pub key: String,
    /// Setting value.
    pub value: String,
    /// What the setting controls.
    pub description: Option<String>,
    /// Grouping for display (e.g. "marketing", "general").
    pub group_name: String,
    /// When the setting was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Get a setting value by key.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_setting(pool: &PgPool, key: &str) -> Result<Option<String>, RepositoryError> {
    let value: Option<String> =
        sqlx::query_scalar("SELECT value FROM system_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    Ok(value)
}

/// Upsert a setting value.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn set_setting(
    pool: &PgPool,
    key: &str,
    value: &str,
    description: Option<&str>,
    group_name: Option<&str>,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO system_settings (key, value, description, group_name)
        VALUES ($1, $2, $3, COALESCE($4, 'general'))
        ON CONFLICT (key) DO UPDATE
        SET value = $2,
            description = COALESCE($3, system_settings.description),
            group_name = COALESCE($4, system_settings.group_name),
            updated_at = NOW()
        ",
    )
    .bind(key)
    .bind(value)
    .bind(description)
    .bind(group_name)
    .execute(pool)
    .await?;

    Ok(())
}

/// List all settings, grouped then keyed alphabetically.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_settings(pool: &PgPool) -> Result<Vec<SystemSetting>, RepositoryError> {
    let settings = sqlx::query_as::<_, SystemSetting>(
        r"
        SELECT key, value, description, group_name, updated_at
        FROM system_settings
        ORDER BY group_name, key
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(settings)
}
