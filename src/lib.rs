//! # Entity Console: Schema-Agnostic Record Management
//!
//! Entity Console is an interactive, menu-driven tool for creating, browsing,
//! updating, deleting and bulk-importing records of any table registered in
//! its catalog. Nothing above the storage adapters knows a concrete table.
//!
//! ## Features
//!
//! - **Metadata catalog**: tables and their fields, each tagged with a value type
//! - **Value coercion**: operator text becomes integers, text or timestamps
//! - **Entity builder**: records assembled from name/value attributes
//! - **Paged reading**: one-line projections shown a fixed number at a time
//! - **Bulk import**: `TableName: ...` blocks loaded from a text file
//! - **SQLite persistence**: Diesel with an r2d2 pool, one session per operation
//!
//! ## Import file format
//!
//! ```text
//! TableName: Authors
//! Id: 1
//! Name: Mary Shelley
//! DateOfBirth: 1797-08-30 00:00:00
//!
//! TableName: Books
//! Id: 1
//! Title: Frankenstein
//! Description: Or, the Modern Prometheus
//! ```

// Core model
pub mod error;
pub mod value;
pub mod entity;
pub mod catalog;
pub mod builder;
pub mod projector;
pub mod pagination;
pub mod import;

// Concrete tables and their Diesel schema
pub mod schema;
pub mod models;

// Storage
pub mod session;
pub mod diesel_runtime;
pub mod memory_store;

// Operator surface
pub mod config;
pub mod console;
pub mod menu;

// Re-export key types
pub use error::DbmsError;
pub use value::{coerce, FieldValue, ValueType, DATETIME_FORMAT};
pub use entity::{Entity, Record};
pub use catalog::{Catalog, EntityDescriptor, FieldDescriptor};
pub use builder::{apply_field, build, AttributeSet};
pub use projector::{project, project_all};
pub use pagination::{paginate, Page, PageAction};
pub use import::{import_batch, parse, ImportSummary, ParsedImport};

// Re-export storage types
pub use session::{PendingChange, SessionFactory, StorageSession};
pub use diesel_runtime::{Database, DatabaseConfig, TableStore};
pub use memory_store::MemoryStore;

pub use config::AppConfig;
pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use menu::{App, MenuAction};
