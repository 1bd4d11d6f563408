//! Flat, human-readable rendering of records.

use crate::catalog::EntityDescriptor;
use crate::entity::{Entity, Record};

/// Render `record` as `"Field1: value1 Field2: value2 ..."`.
///
/// Only persisted fields appear, in descriptor order, so the output is stable
/// for an unmodified record and lines up with the enumeration it came from.
pub fn project(record: &dyn Entity, descriptor: &EntityDescriptor) -> String {
    descriptor
        .persisted_fields()
        .map(|field| match record.get_field(field.name) {
            Some(value) => format!("{}: {}", field.name, value),
            None => format!("{}: ", field.name),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Project every record, preserving order (line N describes record N).
pub fn project_all(records: &[Record], descriptor: &EntityDescriptor) -> Vec<String> {
    records
        .iter()
        .map(|record| project(&**record, descriptor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, BookAuthor, AUTHORS, BOOK_AUTHORS};
    use crate::value::{coerce, FieldValue, ValueType};

    fn author() -> Author {
        Author {
            id: 3,
            name: "Mary Shelley".to_string(),
            date_of_birth: coerce("1797-08-30 00:00:00", ValueType::DateTime)
                .and_then(FieldValue::into_datetime)
                .unwrap(),
        }
    }

    #[test]
    fn test_project_in_descriptor_order() {
        assert_eq!(
            project(&author(), &AUTHORS),
            "Id: 3 Name: Mary Shelley DateOfBirth: 1797-08-30 00:00:00"
        );
    }

    #[test]
    fn test_project_skips_navigation_fields() {
        let link = BookAuthor {
            book_id: 4,
            author_id: 9,
        };
        let line = project(&link, &BOOK_AUTHORS);
        assert_eq!(line, "BookId: 4 AuthorId: 9");
        assert!(!line.contains("Book:"));
    }

    #[test]
    fn test_project_is_stable() {
        let record = author();
        assert_eq!(project(&record, &AUTHORS), project(&record, &AUTHORS));
    }

    #[test]
    fn test_project_all_keeps_order() {
        let records: Vec<Record> = vec![
            Box::new(BookAuthor { book_id: 2, author_id: 1 }),
            Box::new(BookAuthor { book_id: 1, author_id: 1 }),
        ];
        let lines = project_all(&records, &BOOK_AUTHORS);
        assert_eq!(lines, vec!["BookId: 2 AuthorId: 1", "BookId: 1 AuthorId: 1"]);
    }
}
