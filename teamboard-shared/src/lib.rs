//! # TeamBoard Shared Library
//!
//! Store layer and business services for TeamBoard: users, teams with
//! capped membership, and project boards with tasks.
//!
//! ## Module Organization
//!
//! - `config`: Store connection settings from the environment
//! - `db`: Connection pool and embedded migrations
//! - `error`: `ServiceError` and validation details
//! - `models`: Database models and their queries
//! - `services`: User, team and board operations
//! - `export`: Plain-text board reports

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod services;

/// Current version of the TeamBoard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
