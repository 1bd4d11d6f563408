//! Metadata catalog: the static registry of table descriptors.
//!
//! Tables are registered once at startup. Everything downstream (coercion,
//! building, projection, import) works from a descriptor looked up here, so
//! adding a table is a registry edit and nothing else.

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::entity::Record;
use crate::error::DbmsError;
use crate::value::ValueType;

/// Schema entry for one field of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub value_type: ValueType,
}

impl FieldDescriptor {
    pub const fn persisted(name: &'static str, value_type: ValueType) -> Self {
        Self { name, value_type }
    }

    pub const fn navigation(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            value_type: ValueType::Navigation { target },
        }
    }

    pub fn is_relational(&self) -> bool {
        self.value_type.is_navigation()
    }
}

/// Static schema metadata for one table
#[derive(Debug)]
pub struct EntityDescriptor {
    pub table_name: &'static str,
    /// All fields, persisted and relational, in display order
    pub fields: &'static [FieldDescriptor],
    /// Builds a record with every field at its zero value
    pub factory: fn() -> Record,
}

impl EntityDescriptor {
    /// Persisted (non-relational) fields in declaration order
    pub fn persisted_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|field| !field.is_relational())
    }

    /// Look up a persisted field by name
    pub fn persisted_field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.persisted_fields().find(|field| field.name == name)
    }

    pub fn new_blank(&self) -> Record {
        (self.factory)()
    }
}

/// Registry of every table the console can operate on
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: IndexMap<&'static str, &'static EntityDescriptor>,
}

impl Catalog {
    /// Build a catalog, checking that the schema is complete.
    ///
    /// Rejects duplicate table names, duplicate field names within a table,
    /// and navigation fields that point at unregistered tables.
    pub fn new(
        descriptors: impl IntoIterator<Item = &'static EntityDescriptor>,
    ) -> Result<Self, DbmsError> {
        let mut tables = IndexMap::new();

        for descriptor in descriptors {
            if tables.insert(descriptor.table_name, descriptor).is_some() {
                return Err(DbmsError::Config(format!(
                    "table {} registered twice",
                    descriptor.table_name
                )));
            }

            let mut seen = HashSet::new();
            for field in descriptor.fields {
                if !seen.insert(field.name) {
                    return Err(DbmsError::Config(format!(
                        "field {} declared twice on table {}",
                        field.name, descriptor.table_name
                    )));
                }
            }
        }

        for descriptor in tables.values() {
            for field in descriptor.fields {
                if let ValueType::Navigation { target } = field.value_type {
                    if !tables.contains_key(target) {
                        return Err(DbmsError::Config(format!(
                            "{}.{} refers to unknown table {}",
                            descriptor.table_name, field.name, target
                        )));
                    }
                }
            }
        }

        Ok(Self { tables })
    }

    /// Table names in registration order
    pub fn list_tables(&self) -> Vec<&'static str> {
        self.tables.keys().copied().collect()
    }

    pub fn describe(&self, table_name: &str) -> Result<&'static EntityDescriptor, DbmsError> {
        self.tables
            .get(table_name)
            .copied()
            .ok_or_else(|| DbmsError::not_found("table", table_name))
    }

    /// Persisted fields of `descriptor`, excluding relational ones
    pub fn fields_of(&self, descriptor: &EntityDescriptor) -> Vec<&'static FieldDescriptor> {
        descriptor.persisted_fields().collect()
    }

    pub fn new_blank_instance(&self, descriptor: &EntityDescriptor) -> Record {
        descriptor.new_blank()
    }
}
