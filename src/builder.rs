//! Generic record construction and single-field mutation.

use indexmap::IndexMap;

use crate::catalog::EntityDescriptor;
use crate::entity::{Entity, Record};
use crate::error::DbmsError;
use crate::value::{coerce, FieldValue};

/// Field name → coerced value, in the order the values were supplied
pub type AttributeSet = IndexMap<String, FieldValue>;

/// Build a new record of `descriptor` from `attributes`.
///
/// Fields not named in `attributes` keep their zero values. Fails with
/// `MissingTarget` if an attribute is not a persisted field of the table,
/// and `TypeMismatch` if its value has the wrong type.
pub fn build(descriptor: &EntityDescriptor, attributes: &AttributeSet) -> Result<Record, DbmsError> {
    let mut record = descriptor.new_blank();

    for (name, value) in attributes {
        let field = descriptor
            .persisted_field(name)
            .ok_or_else(|| DbmsError::missing_target(descriptor.table_name, name.as_str()))?;

        if value.value_type() != field.value_type {
            return Err(DbmsError::type_mismatch(field.value_type, value.to_string()));
        }
        record.set_field(field.name, value.clone())?;
    }

    Ok(record)
}

/// Coerce `raw` for `field_name` and assign it on `record`.
///
/// Only `field_name` changes; on error the record is left untouched so the
/// caller can re-prompt.
pub fn apply_field(
    record: &mut dyn Entity,
    field_name: &str,
    raw: &str,
) -> Result<FieldValue, DbmsError> {
    let descriptor = record.descriptor();
    let field = descriptor
        .persisted_field(field_name)
        .ok_or_else(|| DbmsError::missing_target(descriptor.table_name, field_name))?;

    let value = coerce(raw, field.value_type)?;
    record.set_field(field.name, value.clone())?;
    Ok(value)
}
