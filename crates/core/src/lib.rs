//! Storeline Core - Shared types library.
//!
//! This crate provides common types used across all Storeline components:
//! - `server` - Retail-operations API (campaign engine, customers, sales)
//! - `cli` - Command-line tools for migrations, seeding and automation sweeps
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the campaign channel/status/trigger enums, and
//!   phone number handling

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
