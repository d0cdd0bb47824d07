//! Storeline server library.
//!
//! This crate provides the retail-operations API as a library, allowing it to
//! be tested and reused (the CLI drives the same services for seeding and
//! automation sweeps).
//!
//! # Architecture
//!
//! - Axum web framework over a `PostgreSQL` pool (sqlx)
//! - Campaign engine in [`services`]: template renderer, channel adapters,
//!   dispatcher, trigger scanner
//! - Append-only audit trail for every send attempt

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
