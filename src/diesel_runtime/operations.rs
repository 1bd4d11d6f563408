//! Per-table persistence adapters.
//!
//! The generic session only deals in [`Record`]s; each table contributes a
//! [`TableStore`] that knows how to move its concrete model in and out of
//! Diesel.

use crate::diesel_runtime::database::DbConnection;
use crate::entity::{Entity, Record};
use crate::error::DbmsError;

/// Diesel operations for one registered table
pub trait TableStore: Sync {
    /// Catalog name of the table this adapter serves
    fn table_name(&self) -> &'static str;

    /// Every row, ordered by primary key so repeated loads enumerate identically
    fn load_all(&self, conn: &mut DbConnection) -> Result<Vec<Record>, DbmsError>;

    fn insert(&self, conn: &mut DbConnection, record: &dyn Entity) -> Result<usize, DbmsError>;

    /// Delete the row whose key matches `record`
    fn delete(&self, conn: &mut DbConnection, record: &dyn Entity) -> Result<usize, DbmsError>;

    /// Overwrite the row keyed by `original` with the values of `updated`.
    /// Key columns may change.
    fn update(
        &self,
        conn: &mut DbConnection,
        original: &dyn Entity,
        updated: &dyn Entity,
    ) -> Result<usize, DbmsError>;
}

/// Turn a zero affected-row count into `NotFound`.
pub fn expect_affected(
    affected: usize,
    table: &'static str,
    record: &dyn Entity,
) -> Result<usize, DbmsError> {
    if affected == 0 {
        Err(DbmsError::not_found("record", format!("{} {:?}", table, record)))
    } else {
        Ok(affected)
    }
}
