//! Storage session contract shared by every backend.
//!
//! A session is opened at the start of one top-level operation and dropped
//! when it ends. Changes are staged with `add`/`remove`/`update` and become
//! visible only after `save`.

use crate::catalog::Catalog;
use crate::entity::Record;
use crate::error::DbmsError;

/// A change staged on a session, applied in order by `save`
#[derive(Debug, Clone)]
pub enum PendingChange {
    Add(Record),
    Remove(Record),
    Update { original: Record, updated: Record },
}

impl PendingChange {
    pub fn table_name(&self) -> &'static str {
        match self {
            PendingChange::Add(record) | PendingChange::Remove(record) => record.table_name(),
            PendingChange::Update { original, .. } => original.table_name(),
        }
    }
}

/// Narrow request/response interface to the persistence backend
pub trait StorageSession {
    /// Tables this backend can store
    fn list_entity_types(&self) -> Vec<&'static str>;

    /// Every committed record of `table_name`, in a stable enumeration order
    fn get(&mut self, table_name: &str) -> Result<Vec<Record>, DbmsError>;

    fn add(&mut self, record: Record);

    fn remove(&mut self, record: Record);

    /// Stage replacing `original` (as loaded) with `updated`
    fn update(&mut self, original: Record, updated: Record);

    /// Commit all staged changes atomically, returning how many were applied
    fn save(&mut self) -> Result<usize, DbmsError>;
}

/// Opens a fresh session per top-level operation
pub trait SessionFactory {
    fn open(&self) -> Result<Box<dyn StorageSession + '_>, DbmsError>;
}

/// Check that the backend can store every table in the catalog.
pub fn check_coverage(catalog: &Catalog, session: &dyn StorageSession) -> Result<(), DbmsError> {
    let backed = session.list_entity_types();
    match catalog
        .list_tables()
        .into_iter()
        .find(|table| !backed.contains(table))
    {
        Some(missing) => Err(DbmsError::not_found("storage for table", missing)),
        None => Ok(()),
    }
}
