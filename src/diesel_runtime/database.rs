//! Database connection management and operations
//!
//! This module provides Diesel-based SQLite connectivity with connection pooling
//! and the [`StorageSession`] implementation used by the console.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use serde::Deserialize;
use std::mem;
use std::time::Duration;

use crate::diesel_runtime::operations::TableStore;
use crate::entity::Record;
use crate::error::DbmsError;
use crate::schema::CREATE_TABLES_SQL;
use crate::session::{PendingChange, SessionFactory, StorageSession};

pub type DbConnection = SqliteConnection;
pub type Pool = r2d2::Pool<ConnectionManager<DbConnection>>;
pub type PooledConnection = r2d2::PooledConnection<ConnectionManager<DbConnection>>;

/// Database connection pool manager
pub struct Database {
    pool: Pool,
    stores: &'static [&'static dyn TableStore],
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `database_url` - SQLite file path (e.g., "entity_console.db")
    /// * `stores` - One adapter per table the console may touch
    ///
    /// # Example
    /// ```ignore
    /// let db = Database::new("entity_console.db", models::TABLE_STORES)?;
    /// db.initialize_schema()?;
    /// ```
    pub fn new(
        database_url: &str,
        stores: &'static [&'static dyn TableStore],
    ) -> Result<Self, DbmsError> {
        Self::new_with_config(database_url, DatabaseConfig::default(), stores)
    }

    /// Create a new database with custom configuration
    pub fn new_with_config(
        database_url: &str,
        config: DatabaseConfig,
        stores: &'static [&'static dyn TableStore],
    ) -> Result<Self, DbmsError> {
        config.validate().map_err(DbmsError::Config)?;
        let manager = ConnectionManager::<DbConnection>::new(database_url);

        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_idle))
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
            .max_lifetime(Some(Duration::from_secs(config.max_lifetime_secs)))
            .connection_customizer(Box::new(ForeignKeys))
            .build(manager)?;

        tracing::info!("Opened database at {}", database_url);

        Ok(Database { pool, stores })
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<PooledConnection, DbmsError> {
        Ok(self.pool.get()?)
    }

    /// Create the bundled tables if they do not exist yet
    pub fn initialize_schema(&self) -> Result<(), DbmsError> {
        let mut conn = self.get_connection()?;
        conn.batch_execute(CREATE_TABLES_SQL)?;
        Ok(())
    }

    /// Test database connectivity
    pub fn test_connection(&self) -> Result<(), DbmsError> {
        let mut conn = self.get_connection()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}

impl SessionFactory for Database {
    fn open(&self) -> Result<Box<dyn StorageSession + '_>, DbmsError> {
        Ok(Box::new(DbSession {
            conn: self.get_connection()?,
            stores: self.stores,
            pending: Vec::new(),
        }))
    }
}

/// Enables SQLite foreign key enforcement on every pooled connection so
/// link rows cascade when their parent is deleted.
#[derive(Debug)]
struct ForeignKeys;

impl CustomizeConnection<DbConnection, r2d2::Error> for ForeignKeys {
    fn on_acquire(&self, conn: &mut DbConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON")
            .map_err(r2d2::Error::QueryError)
    }
}

/// One checked-out connection plus the changes staged on it.
/// The connection returns to the pool when the session is dropped.
pub struct DbSession {
    conn: PooledConnection,
    stores: &'static [&'static dyn TableStore],
    pending: Vec<PendingChange>,
}

fn find_store(
    stores: &'static [&'static dyn TableStore],
    table_name: &str,
) -> Result<&'static dyn TableStore, DbmsError> {
    stores
        .iter()
        .copied()
        .find(|store| store.table_name() == table_name)
        .ok_or_else(|| DbmsError::not_found("table", table_name))
}

impl StorageSession for DbSession {
    fn list_entity_types(&self) -> Vec<&'static str> {
        self.stores.iter().map(|store| store.table_name()).collect()
    }

    fn get(&mut self, table_name: &str) -> Result<Vec<Record>, DbmsError> {
        let store = find_store(self.stores, table_name)?;
        let records = store.load_all(&mut self.conn)?;
        tracing::debug!(table = table_name, count = records.len(), "Loaded records");
        Ok(records)
    }

    fn add(&mut self, record: Record) {
        self.pending.push(PendingChange::Add(record));
    }

    fn remove(&mut self, record: Record) {
        self.pending.push(PendingChange::Remove(record));
    }

    fn update(&mut self, original: Record, updated: Record) {
        self.pending.push(PendingChange::Update { original, updated });
    }

    fn save(&mut self) -> Result<usize, DbmsError> {
        let pending = mem::take(&mut self.pending);
        let stores = self.stores;
        let conn: &mut DbConnection = &mut self.conn;

        let applied = conn.transaction::<_, DbmsError, _>(|conn| {
            for change in &pending {
                let store = find_store(stores, change.table_name())?;
                match change {
                    PendingChange::Add(record) => store.insert(conn, &**record)?,
                    PendingChange::Remove(record) => store.delete(conn, &**record)?,
                    PendingChange::Update { original, updated } => {
                        store.update(conn, &**original, &**updated)?
                    }
                };
            }
            Ok(pending.len())
        });

        match &applied {
            Ok(count) => tracing::info!(changes = count, "Committed changes"),
            Err(err) => tracing::warn!(error = %err, "Commit rolled back"),
        }
        applied
    }
}

/// Database configuration options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub min_idle: u32,
    pub connection_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    /// Check the settings the r2d2 pool builder would otherwise panic on.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("pool.max_connections must be at least 1".to_string());
        }
        if self.min_idle > self.max_connections {
            return Err(format!(
                "pool.min_idle ({}) must not exceed pool.max_connections ({})",
                self.min_idle, self.max_connections
            ));
        }
        let timeouts = [
            ("connection_timeout_secs", self.connection_timeout_secs),
            ("idle_timeout_secs", self.idle_timeout_secs),
            ("max_lifetime_secs", self.max_lifetime_secs),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(format!("pool.{} must be greater than 0", name));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            max_connections: 2,           // One operator; a spare for startup checks
            min_idle: 1,                  // Keep a warm connection between actions
            connection_timeout_secs: 30,  // Wait up to 30s for connection
            idle_timeout_secs: 600,       // Close idle connections after 10 min
            max_lifetime_secs: 1800,      // Recycle connections after 30 min
        }
    }
}
