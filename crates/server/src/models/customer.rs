//! Customer domain model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeline_core::{CustomerId, StoreId};

/// A message recipient.
///
/// Phone and email are both optional; the channel adapters validate that the
/// field their transport needs is populated before attempting a send.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Store this customer belongs to.
    pub store_id: StoreId,
    /// Customer name.
    pub name: String,
    /// Phone number (required for SMS/WhatsApp campaigns).
    pub phone: Option<String>,
    /// Email address (required for Email campaigns).
    pub email: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Date of birth (used by the birthday trigger).
    pub date_of_birth: Option<NaiveDate>,
    /// Most recent purchase (used by the no-purchase trigger).
    pub last_purchase_date: Option<DateTime<Utc>>,
    /// Cumulative purchase total.
    pub total_purchases: Decimal,
    /// Loyalty points balance.
    pub loyalty_points: i32,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerInput {
    /// Store the customer belongs to.
    pub store_id: StoreId,
    /// Customer name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
}

/// Input for updating a customer. `None` fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCustomerInput {
    /// Customer name.
    pub name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Loyalty points balance.
    pub loyalty_points: Option<i32>,
}
