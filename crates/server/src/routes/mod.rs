//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (DB ping)
//!
//! # Stores
//! POST /stores                      - Create store
//! GET  /stores                      - List stores
//! GET  /stores/{id}                 - Store detail
//!
//! # Customers
//! POST   /customers                 - Create customer
//! GET    /customers?store_id=       - List customers of a store
//! GET    /customers/{id}            - Customer detail
//! PUT    /customers/{id}            - Update customer
//! DELETE /customers/{id}            - Delete customer
//!
//! # Campaigns
//! POST   /campaigns                 - Create campaign (starts in Draft)
//! GET    /campaigns?store_id=       - List campaigns of a store
//! GET    /campaigns/{id}            - Campaign detail
//! PUT    /campaigns/{id}            - Update campaign
//! DELETE /campaigns/{id}            - Delete campaign
//! POST   /campaigns/{id}/status     - Lifecycle transition (state machine)
//! POST   /campaigns/{id}/execute    - Dispatch to recipients
//! POST   /campaigns/{id}/test       - Preview send to one customer
//! GET    /campaigns/{id}/logs       - Audit trail (paginated, newest first)
//!
//! # Sales
//! POST /sales                       - Record a sale (feeds triggers)
//! GET  /sales/{id}                  - Sale detail with line items
//!
//! # Automation
//! POST /automation/run              - Run one trigger sweep
//! GET  /automation/credentials      - Which transports are configured
//!
//! # Settings
//! GET /settings                     - List settings (secrets masked)
//! PUT /settings/{key}               - Upsert a setting
//! ```

pub mod automation;
pub mod campaigns;
pub mod customers;
pub mod sales;
pub mod settings;
pub mod stores;

use axum::Router;

use crate::state::AppState;

/// Build the combined API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(stores::router())
        .merge(customers::router())
        .merge(campaigns::router())
        .merge(sales::router())
        .merge(automation::router())
        .merge(settings::router())
}
