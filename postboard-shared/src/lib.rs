//! # Postboard Shared Library
//!
//! Domain types, persistence ports and services used by the Postboard API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: Users, posts and access tokens
//! - `store`: Persistence traits with PostgreSQL and in-memory adapters
//! - `auth`: Password hashing and opaque token capabilities
//! - `services`: Auth and post services
//! - `validation`: Field-keyed validation errors
//! - `error`: Service error taxonomy
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

/// Current version of the Postboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
