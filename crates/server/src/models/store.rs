//! Store (tenant) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeline_core::StoreId;

/// A retail store. Every customer, campaign and sale belongs to exactly one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Whether the store is active.
    pub is_active: bool,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStoreInput {
    /// Store display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}
