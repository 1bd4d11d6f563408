//! Diesel ORM runtime infrastructure
//!
//! Connection pooling, the storage session that stages and commits changes,
//! and the per-table adapter trait implemented by each model.

pub mod database;
pub mod operations;

// Re-export key types
pub use database::{Database, DatabaseConfig, DbConnection, DbSession, Pool, PooledConnection};
pub use operations::TableStore;
