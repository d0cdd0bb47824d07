//! Domain models for the Storeline API.

pub mod campaign;
pub mod campaign_log;
pub mod customer;
pub mod sale;
pub mod store;

pub use campaign::{Campaign, CreateCampaignInput, UpdateCampaignInput};
pub use campaign_log::{CampaignLogWithCustomer, DeliveryStatus, NewCampaignLog};
pub use customer::{CreateCustomerInput, Customer, UpdateCustomerInput};
pub use sale::{CreateSaleInput, CreateSaleItemInput, Sale, SaleItem, SaleWithItems};
pub use store::{CreateStoreInput, Store};
