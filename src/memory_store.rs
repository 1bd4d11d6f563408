//! In-process storage backend.
//!
//! Holds committed records per table in insertion order. Sessions stage
//! changes locally and `save` applies them to a copy of the tables, swapping
//! the copy in only if every change applied.

use indexmap::IndexMap;
use std::cell::RefCell;

use crate::catalog::Catalog;
use crate::entity::{same_row, Record};
use crate::error::DbmsError;
use crate::session::{PendingChange, SessionFactory, StorageSession};

type Tables = IndexMap<&'static str, Vec<Record>>;

/// Storage backend kept entirely in memory
#[derive(Debug)]
pub struct MemoryStore {
    tables: RefCell<Tables>,
}

impl MemoryStore {
    /// Empty store with one table per catalog entry
    pub fn new(catalog: &Catalog) -> Self {
        let tables = catalog
            .list_tables()
            .into_iter()
            .map(|table| (table, Vec::new()))
            .collect();
        Self {
            tables: RefCell::new(tables),
        }
    }

    /// Number of committed records in `table_name`
    pub fn count(&self, table_name: &str) -> usize {
        self.tables
            .borrow()
            .get(table_name)
            .map_or(0, |rows| rows.len())
    }

    /// Committed records of `table_name`, in enumeration order
    pub fn snapshot(&self, table_name: &str) -> Vec<Record> {
        self.tables
            .borrow()
            .get(table_name)
            .cloned()
            .unwrap_or_default()
    }
}

impl SessionFactory for MemoryStore {
    fn open(&self) -> Result<Box<dyn StorageSession + '_>, DbmsError> {
        Ok(Box::new(MemorySession {
            store: self,
            pending: Vec::new(),
        }))
    }
}

/// Session over a [`MemoryStore`]
pub struct MemorySession<'a> {
    store: &'a MemoryStore,
    pending: Vec<PendingChange>,
}

fn rows_mut<'t>(tables: &'t mut Tables, table_name: &str) -> Result<&'t mut Vec<Record>, DbmsError> {
    tables
        .get_mut(table_name)
        .ok_or_else(|| DbmsError::not_found("table", table_name))
}

fn position(rows: &[Record], target: &Record) -> Result<usize, DbmsError> {
    rows.iter()
        .position(|row| same_row(&**row, &**target))
        .ok_or_else(|| DbmsError::not_found("record", format!("{:?}", target)))
}

fn apply(tables: &mut Tables, change: PendingChange) -> Result<(), DbmsError> {
    let rows = rows_mut(tables, change.table_name())?;
    match change {
        PendingChange::Add(record) => rows.push(record),
        PendingChange::Remove(record) => {
            let index = position(rows, &record)?;
            rows.remove(index);
        }
        PendingChange::Update { original, updated } => {
            let index = position(rows, &original)?;
            rows[index] = updated;
        }
    }
    Ok(())
}

impl StorageSession for MemorySession<'_> {
    fn list_entity_types(&self) -> Vec<&'static str> {
        self.store.tables.borrow().keys().copied().collect()
    }

    fn get(&mut self, table_name: &str) -> Result<Vec<Record>, DbmsError> {
        self.store
            .tables
            .borrow()
            .get(table_name)
            .cloned()
            .ok_or_else(|| DbmsError::not_found("table", table_name))
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
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();

        let mut staged = self.store.tables.borrow().clone();
        for change in pending {
            apply(&mut staged, change)?;
        }
        *self.store.tables.borrow_mut() = staged;

        tracing::debug!(changes = count, "Committed changes to memory store");
        Ok(count)
    }
}
