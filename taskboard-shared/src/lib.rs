//! # Taskboard Shared Library
//!
//! Data layer used by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and schema initializer
//! - `models`: users and tasks with their SQL operations
//! - `error`: storage error taxonomy

pub mod db;
pub mod error;
pub mod models;

pub use error::{StoreError, StoreResult};

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
