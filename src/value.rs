//! Typed field values and the coercion of free text into them.
//!
//! Every value that crosses from operator input (or an import file) into a
//! record goes through [`coerce`], so a bad token is rejected at the boundary
//! instead of at assignment time.

use chrono::NaiveDateTime;
use std::fmt;

use crate::error::DbmsError;

/// Canonical text form of a `DateTime` value, used for both parsing and display.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared type of a field in an entity descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Text,
    DateTime,
    /// Relationship to another table, resolved by the storage layer.
    /// Never coerced, displayed, or edited.
    Navigation { target: &'static str },
}

impl ValueType {
    pub fn is_navigation(&self) -> bool {
        matches!(self, ValueType::Navigation { .. })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "Integer"),
            ValueType::Text => write!(f, "Text"),
            ValueType::DateTime => write!(f, "DateTime ({})", DATETIME_FORMAT),
            ValueType::Navigation { target } => write!(f, "Navigation({})", target),
        }
    }
}

/// A coerced, strongly typed field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldValue::Integer(_) => ValueType::Integer,
            FieldValue::Text(_) => ValueType::Text,
            FieldValue::DateTime(_) => ValueType::DateTime,
        }
    }

    pub fn into_integer(self) -> Result<i64, DbmsError> {
        match self {
            FieldValue::Integer(i) => Ok(i),
            other => Err(DbmsError::type_mismatch(ValueType::Integer, other.to_string())),
        }
    }

    pub fn into_text(self) -> Result<String, DbmsError> {
        match self {
            FieldValue::Text(s) => Ok(s),
            other => Err(DbmsError::type_mismatch(ValueType::Text, other.to_string())),
        }
    }

    pub fn into_datetime(self) -> Result<NaiveDateTime, DbmsError> {
        match self {
            FieldValue::DateTime(dt) => Ok(dt),
            other => Err(DbmsError::type_mismatch(ValueType::DateTime, other.to_string())),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

/// Convert raw operator text into a value of `target` type.
///
/// Integers use exact base-10 parsing, so `"12abc"` and values outside the
/// `i64` range are both rejected. Dates must match [`DATETIME_FORMAT`].
/// Text passes through untouched. Surrounding whitespace is ignored for
/// non-text types, and blank input for them is always a mismatch.
pub fn coerce(raw: &str, target: ValueType) -> Result<FieldValue, DbmsError> {
    let mismatch = || DbmsError::type_mismatch(target, raw);

    match target {
        ValueType::Text => Ok(FieldValue::Text(raw.to_string())),
        ValueType::Integer => {
            let token = raw.trim();
            if token.is_empty() {
                return Err(mismatch());
            }
            token
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| mismatch())
        }
        ValueType::DateTime => {
            let token = raw.trim();
            if token.is_empty() {
                return Err(mismatch());
            }
            NaiveDateTime::parse_from_str(token, DATETIME_FORMAT)
                .map(FieldValue::DateTime)
                .map_err(|_| mismatch())
        }
        ValueType::Navigation { .. } => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce("42", ValueType::Integer), Ok(FieldValue::Integer(42)));
        assert_eq!(coerce(" -7 ", ValueType::Integer), Ok(FieldValue::Integer(-7)));
    }

    #[test]
    fn test_coerce_integer_rejects_partial_and_blank() {
        for raw in ["abc", "12abc", "4.2", "", "   "] {
            let result = coerce(raw, ValueType::Integer);
            assert!(
                matches!(result, Err(DbmsError::TypeMismatch { expected: ValueType::Integer, .. })),
                "{:?} should not coerce",
                raw
            );
        }
    }

    #[test]
    fn test_coerce_integer_overflow_is_mismatch() {
        let result = coerce("9223372036854775808", ValueType::Integer);
        assert!(matches!(result, Err(DbmsError::TypeMismatch { .. })));

        assert_eq!(
            coerce("9223372036854775807", ValueType::Integer),
            Ok(FieldValue::Integer(i64::MAX))
        );
    }

    #[test]
    fn test_coerce_text_passes_through() {
        assert_eq!(
            coerce("hello", ValueType::Text),
            Ok(FieldValue::Text("hello".to_string()))
        );
        assert_eq!(coerce("", ValueType::Text), Ok(FieldValue::Text(String::new())));
        assert_eq!(
            coerce("  padded ", ValueType::Text),
            Ok(FieldValue::Text("  padded ".to_string()))
        );
    }

    #[test]
    fn test_coerce_datetime_canonical_format() {
        let expected = NaiveDate::from_ymd_opt(1965, 7, 31)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(
            coerce("1965-07-31 08:30:00", ValueType::DateTime),
            Ok(FieldValue::DateTime(expected))
        );

        for raw in ["1965-07-31", "31/07/1965 08:30:00", "", "yesterday"] {
            assert!(coerce(raw, ValueType::DateTime).is_err(), "{:?}", raw);
        }
    }

    #[test]
    fn test_navigation_fields_never_coerce() {
        let target = ValueType::Navigation { target: "Books" };
        assert!(coerce("1", target).is_err());
    }

    #[test]
    fn test_datetime_display_round_trips() {
        let value = coerce("2001-02-03 04:05:06", ValueType::DateTime).unwrap();
        assert_eq!(value.to_string(), "2001-02-03 04:05:06");
        assert_eq!(coerce(&value.to_string(), ValueType::DateTime), Ok(value));
    }

    #[test]
    fn test_into_accessors_check_type() {
        assert_eq!(FieldValue::Integer(3).into_integer(), Ok(3));
        assert!(FieldValue::Text("3".into()).into_integer().is_err());
        assert!(FieldValue::Integer(3).into_text().is_err());
    }
}
