//! Sale records feeding the trigger scanner.
//!
//! Storeline keeps a minimal purchase history: enough for the no-purchase and
//! warranty-expiry triggers and for the customer's cumulative totals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeline_core::{CustomerId, SaleId, SaleItemId, StoreId};

/// A recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sale {
    /// Unique sale ID.
    pub id: SaleId,
    /// Store the sale happened in.
    pub store_id: StoreId,
    /// Purchasing customer, if known (walk-ins have none).
    pub customer_id: Option<CustomerId>,
    /// Total amount paid.
    pub total_amount: Decimal,
    /// When the sale happened.
    pub sale_date: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// A line item on a sale.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SaleItem {
    /// Unique item ID.
    pub id: SaleItemId,
    /// Sale this item belongs to.
    pub sale_id: SaleId,
    /// Product name at time of sale.
    pub product_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// When the product's warranty runs out, if it carries one.
    pub warranty_expires_at: Option<DateTime<Utc>>,
}

/// A sale with its line items, for detail views.
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    /// The sale itself.
    #[serde(flatten)]
    pub sale: Sale,
    /// Its line items.
    pub items: Vec<SaleItem>,
}

/// Input for one line item of a new sale.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleItemInput {
    /// Product name.
    pub product_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Warranty length in months, if the product carries one.
    pub warranty_months: Option<u32>,
}

/// Input for recording a sale.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleInput {
    /// Store the sale happened in.
    pub store_id: StoreId,
    /// Purchasing customer, if known.
    pub customer_id: Option<CustomerId>,
    /// When the sale happened; defaults to now.
    pub sale_date: Option<DateTime<Utc>>,
    /// Line items; must be non-empty.
    pub items: Vec<CreateSaleItemInput>,
}
