// Postgres storage layer with sqlx
//
// This crate provides the Database repository plus the ScanStore
// implementation consumed by the core scan resolver.

pub mod models;
pub mod repositories;
pub mod scan_store;

pub use models::*;
pub use repositories::Database;
