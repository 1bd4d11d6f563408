//! Core entity trait implemented once per table.
//!
//! An [`Entity`] is the uniform adapter the generic engine talks to: it can
//! report its descriptor and read or write any persisted field by name. The
//! engine never names a concrete record type.

use std::any::Any;
use std::fmt;

use crate::catalog::EntityDescriptor;
use crate::error::DbmsError;
use crate::value::FieldValue;

/// Per-table record adapter.
///
/// # Example
///
/// ```ignore
/// impl Entity for Book {
///     fn descriptor(&self) -> &'static EntityDescriptor { &BOOKS }
///
///     fn get_field(&self, name: &str) -> Option<FieldValue> {
///         match name {
///             "Id" => Some(FieldValue::Integer(self.id)),
///             _ => None,
///         }
///     }
///     // ...
/// }
/// ```
pub trait Entity: fmt::Debug + Any {
    /// Descriptor of the table this record belongs to
    fn descriptor(&self) -> &'static EntityDescriptor;

    /// Read a persisted field. Navigation and unknown names yield `None`.
    fn get_field(&self, name: &str) -> Option<FieldValue>;

    /// Assign a persisted field.
    ///
    /// Fails with `MissingTarget` for names that are not persisted fields and
    /// `TypeMismatch` when the value has the wrong type.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DbmsError>;

    fn clone_record(&self) -> Record;

    fn as_any(&self) -> &dyn Any;

    fn table_name(&self) -> &'static str {
        self.descriptor().table_name
    }
}

/// A dynamically typed row owned by whichever storage session produced it
pub type Record = Box<dyn Entity>;

impl Clone for Record {
    fn clone(&self) -> Self {
        self.clone_record()
    }
}

/// Values of every persisted field, in descriptor order.
pub fn persisted_values(record: &dyn Entity) -> Vec<Option<FieldValue>> {
    record
        .descriptor()
        .persisted_fields()
        .map(|field| record.get_field(field.name))
        .collect()
}

/// True when both records belong to the same table and hold equal persisted values.
pub fn same_row(a: &dyn Entity, b: &dyn Entity) -> bool {
    a.table_name() == b.table_name() && persisted_values(a) == persisted_values(b)
}

/// Borrow the concrete model behind a record.
pub fn downcast<T: Entity>(record: &dyn Entity) -> Result<&T, DbmsError> {
    record.as_any().downcast_ref::<T>().ok_or_else(|| {
        DbmsError::Persistence(format!(
            "record of table {} has an unexpected backing type",
            record.table_name()
        ))
    })
}
