//! Core types for Storeline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod channel;
pub mod id;
pub mod phone;
pub mod status;
pub mod trigger;

pub use channel::Channel;
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use status::CampaignStatus;
pub use trigger::TriggerKind;
