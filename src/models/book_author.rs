//! `BookAuthors` link table. Both columns are keys and both are foreign keys,
//! so the navigation fields `Book` and `Author` stay out of display and edit.

use diesel::prelude::*;
use std::any::Any;

use crate::catalog::{EntityDescriptor, FieldDescriptor};
use crate::diesel_runtime::{DbConnection, TableStore};
use crate::diesel_runtime::operations::expect_affected;
use crate::entity::{downcast, Entity, Record};
use crate::error::DbmsError;
use crate::schema::book_authors;
use crate::value::{FieldValue, ValueType};

#[derive(Debug, Clone, Default, PartialEq, Queryable, Insertable)]
#[diesel(table_name = book_authors)]
pub struct BookAuthor {
    pub book_id: i64,
    pub author_id: i64,
}

pub static BOOK_AUTHORS: EntityDescriptor = EntityDescriptor {
    table_name: "BookAuthors",
    fields: &[
        FieldDescriptor::persisted("BookId", ValueType::Integer),
        FieldDescriptor::persisted("AuthorId", ValueType::Integer),
        FieldDescriptor::navigation("Book", "Books"),
        FieldDescriptor::navigation("Author", "Authors"),
    ],
    factory: new_blank,
};

pub fn new_blank() -> Record {
    Box::new(BookAuthor::default())
}

impl Entity for BookAuthor {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &BOOK_AUTHORS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "BookId" => Some(FieldValue::Integer(self.book_id)),
            "AuthorId" => Some(FieldValue::Integer(self.author_id)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DbmsError> {
        match name {
            "BookId" => self.book_id = value.into_integer()?,
            "AuthorId" => self.author_id = value.into_integer()?,
            _ => return Err(DbmsError::missing_target(BOOK_AUTHORS.table_name, name)),
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

/// Diesel adapter for `book_authors`
pub struct BookAuthorTable;

impl TableStore for BookAuthorTable {
    fn table_name(&self) -> &'static str {
        BOOK_AUTHORS.table_name
    }

    fn load_all(&self, conn: &mut DbConnection) -> Result<Vec<Record>, DbmsError> {
        let rows = book_authors::table
            .order((book_authors::author_id.asc(), book_authors::book_id.asc()))
            .load::<BookAuthor>(conn)?;
        Ok(rows.into_iter().map(|row| Box::new(row) as Record).collect())
    }

    fn insert(&self, conn: &mut DbConnection, record: &dyn Entity) -> Result<usize, DbmsError> {
        let link = downcast::<BookAuthor>(record)?;
        Ok(diesel::insert_into(book_authors::table).values(link).execute(conn)?)
    }

    fn delete(&self, conn: &mut DbConnection, record: &dyn Entity) -> Result<usize, DbmsError> {
        let link = downcast::<BookAuthor>(record)?;
        let affected = diesel::delete(book_authors::table.find((link.author_id, link.book_id)))
            .execute(conn)?;
        expect_affected(affected, BOOK_AUTHORS.table_name, record)
    }

    fn update(
        &self,
        conn: &mut DbConnection,
        original: &dyn Entity,
        updated: &dyn Entity,
    ) -> Result<usize, DbmsError> {
        let key = downcast::<BookAuthor>(original)?;
        let link = downcast::<BookAuthor>(updated)?;
        let affected = diesel::update(book_authors::table.find((key.author_id, key.book_id)))
            .set((
                book_authors::book_id.eq(link.book_id),
                book_authors::author_id.eq(link.author_id),
            ))
            .execute(conn)?;
        expect_affected(affected, BOOK_AUTHORS.table_name, original)
    }
}
