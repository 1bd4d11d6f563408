//! `Books` table: model, descriptor, and adapters.

use diesel::prelude::*;
use std::any::Any;

use crate::catalog::{EntityDescriptor, FieldDescriptor};
use crate::diesel_runtime::{DbConnection, TableStore};
use crate::diesel_runtime::operations::expect_affected;
use crate::entity::{downcast, Entity, Record};
use crate::error::DbmsError;
use crate::schema::books;
use crate::value::{FieldValue, ValueType};

#[derive(Debug, Clone, Default, PartialEq, Queryable, Insertable)]
#[diesel(table_name = books)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: String,
}

pub static BOOKS: EntityDescriptor = EntityDescriptor {
    table_name: "Books",
    fields: &[
        FieldDescriptor::persisted("Id", ValueType::Integer),
        FieldDescriptor::persisted("Title", ValueType::Text),
        FieldDescriptor::persisted("Description", ValueType::Text),
        FieldDescriptor::navigation("BookAuthors", "BookAuthors"),
    ],
    factory: new_blank,
};

pub fn new_blank() -> Record {
    Box::new(Book::default())
}

impl Entity for Book {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &BOOKS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "Id" => Some(FieldValue::Integer(self.id)),
            "Title" => Some(FieldValue::Text(self.title.clone())),
            "Description" => Some(FieldValue::Text(self.description.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DbmsError> {
        match name {
            "Id" => self.id = value.into_integer()?,
            "Title" => self.title = value.into_text()?,
            "Description" => self.description = value.into_text()?,
            _ => return Err(DbmsError::missing_target(BOOKS.table_name, name)),
        }
        Ok(())
    }

    fn clone_record(&self) -> Record {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Diesel adapter for `books`
pub struct BookTable;

impl TableStore for BookTable {
    fn table_name(&self) -> &'static str {
        BOOKS.table_name
    }

    fn load_all(&self, conn: &mut DbConnection) -> Result<Vec<Record>, DbmsError> {
        let rows = books::table.order(books::id.asc()).load::<Book>(conn)?;
        Ok(rows.into_iter().map(|row| Box::new(row) as Record).collect())
    }

    fn insert(&self, conn: &mut DbConnection, record: &dyn Entity) -> Result<usize, DbmsError> {
        let book = downcast::<Book>(record)?;
        Ok(diesel::insert_into(books::table).values(book).execute(conn)?)
    }

    fn delete(&self, conn: &mut DbConnection, record: &dyn Entity) -> Result<usize, DbmsError> {
        let book = downcast::<Book>(record)?;
        let affected = diesel::delete(books::table.find(book.id)).execute(conn)?;
        expect_affected(affected, BOOKS.table_name, record)
    }

    fn update(
        &self,
        conn: &mut DbConnection,
        original: &dyn Entity,
        updated: &dyn Entity,
    ) -> Result<usize, DbmsError> {
        let key = downcast::<Book>(original)?.id;
        let book = downcast::<Book>(updated)?;
        let affected = diesel::update(books::table.find(key))
            .set((
                books::id.eq(book.id),
                books::title.eq(&book.title),
                books::description.eq(&book.description),
            ))
            .execute(conn)?;
        expect_affected(affected, BOOKS.table_name, original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_fields() {
        let mut book = Book::default();
        book.set_field("Title", FieldValue::Text("Dune".into())).unwrap();
        book.set_field("Id", FieldValue::Integer(7)).unwrap();

        assert_eq!(book.get_field("Title"), Some(FieldValue::Text("Dune".into())));
        assert_eq!(book.get_field("Id"), Some(FieldValue::Integer(7)));
        assert_eq!(book.get_field("BookAuthors"), None);
    }

    #[test]
    fn test_set_field_rejects_navigation_and_wrong_type() {
        let mut book = Book::default();
        assert!(matches!(
            book.set_field("BookAuthors", FieldValue::Integer(1)),
            Err(DbmsError::MissingTarget { .. })
        ));
        assert!(matches!(
            book.set_field("Id", FieldValue::Text("x".into())),
            Err(DbmsError::TypeMismatch { .. })
        ));
    }
}
