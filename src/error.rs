//! Error type shared by the catalog, coercion, builder, import and storage layers.

use std::fmt;

use crate::value::ValueType;

/// Error type for entity console operations
#[derive(Debug, Clone, PartialEq)]
pub enum DbmsError {
    /// Unknown table, entity, record or option
    NotFound {
        kind: &'static str,
        name: String,
    },
    /// Raw input could not be converted to the target field type
    TypeMismatch {
        expected: ValueType,
        input: String,
    },
    /// An attribute names a field the target table does not persist
    MissingTarget {
        table: String,
        field: String,
    },
    /// An import block started with something other than `TableName`
    MissingTableDeclaration {
        line: usize,
    },
    /// An import line is not of the form `key: value`, or repeats a key
    MalformedLine {
        line: usize,
        reason: String,
    },
    /// The import file could not be read
    ImportFile {
        path: String,
        reason: String,
    },
    /// Commit or load failure in the storage backend
    Persistence(String),
    /// The operator's console is closed or unreadable
    Console(String),
    /// Startup configuration is invalid
    Config(String),
}

impl DbmsError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        DbmsError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn type_mismatch(expected: ValueType, input: impl Into<String>) -> Self {
        DbmsError::TypeMismatch {
            expected,
            input: input.into(),
        }
    }

    pub fn missing_target(table: impl Into<String>, field: impl Into<String>) -> Self {
        DbmsError::MissingTarget {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Console failures end the session; everything else is reported and survived.
    pub fn is_console_closed(&self) -> bool {
        matches!(self, DbmsError::Console(_))
    }
}

impl fmt::Display for DbmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbmsError::NotFound { kind, name } => write!(f, "Couldn't find {} '{}'", kind, name),
            DbmsError::TypeMismatch { expected, input } => {
                write!(f, "Input '{}' not correct type, expecting {}", input, expected)
            }
            DbmsError::MissingTarget { table, field } => {
                write!(f, "Property {} not found in entity {}.", field, table)
            }
            DbmsError::MissingTableDeclaration { line } => {
                write!(f, "No TableName defined for entry starting at line {}", line)
            }
            DbmsError::MalformedLine { line, reason } => {
                write!(f, "Malformed line {}: {}", line, reason)
            }
            DbmsError::ImportFile { path, reason } => {
                write!(f, "Cannot import data from {}: {}", path, reason)
            }
            DbmsError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            DbmsError::Console(msg) => write!(f, "Console error: {}", msg),
            DbmsError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DbmsError {}

impl From<diesel::result::Error> for DbmsError {
    fn from(err: diesel::result::Error) -> Self {
        DbmsError::Persistence(err.to_string())
    }
}

impl From<r2d2::Error> for DbmsError {
    fn from(err: r2d2::Error) -> Self {
        DbmsError::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for DbmsError {
    fn from(err: std::io::Error) -> Self {
        DbmsError::Console(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offending_field() {
        let err = DbmsError::missing_target("Books", "Pages");
        assert_eq!(err.to_string(), "Property Pages not found in entity Books.");
    }

    #[test]
    fn test_only_console_errors_close_the_session() {
        assert!(DbmsError::Console("eof".into()).is_console_closed());
        assert!(!DbmsError::Persistence("locked".into()).is_console_closed());
        assert!(!DbmsError::type_mismatch(ValueType::Integer, "x").is_console_closed());
    }
}
