//! `Authors` table: model, descriptor, and adapters.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::any::Any;

use crate::catalog::{EntityDescriptor, FieldDescriptor};
use crate::diesel_runtime::{DbConnection, TableStore};
use crate::diesel_runtime::operations::expect_affected;
use crate::entity::{downcast, Entity, Record};
use crate::error::DbmsError;
use crate::schema::authors;
use crate::value::{FieldValue, ValueType};

#[derive(Debug, Clone, Default, PartialEq, Queryable, Insertable)]
#[diesel(table_name = authors)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDateTime,
}

pub static AUTHORS: EntityDescriptor = EntityDescriptor {
    table_name: "Authors",
    fields: &[
        FieldDescriptor::persisted("Id", ValueType::Integer),
        FieldDescriptor::persisted("Name", ValueType::Text),
        FieldDescriptor::persisted("DateOfBirth", ValueType::DateTime),
        FieldDescriptor::navigation("BookAuthors", "BookAuthors"),
    ],
    factory: new_blank,
};

pub fn new_blank() -> Record {
    Box::new(Author::default())
}

impl Entity for Author {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &AUTHORS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "Id" => Some(FieldValue::Integer(self.id)),
            "Name" => Some(FieldValue::Text(self.name.clone())),
            "DateOfBirth" => Some(FieldValue::DateTime(self.date_of_birth)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DbmsError> {
        match name {
            "Id" => self.id = value.into_integer()?,
            "Name" => self.name = value.into_text()?,
            "DateOfBirth" => self.date_of_birth = value.into_datetime()?,
            _ => return Err(DbmsError::missing_target(AUTHORS.table_name, name)),
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

/// Diesel adapter for `authors`
pub struct AuthorTable;

impl TableStore for AuthorTable {
    fn table_name(&self) -> &'static str {
        AUTHORS.table_name
    }

    fn load_all(&self, conn: &mut DbConnection) -> Result<Vec<Record>, DbmsError> {
        let rows = authors::table.order(authors::id.asc()).load::<Author>(conn)?;
        Ok(rows.into_iter().map(|row| Box::new(row) as Record).collect())
    }

    fn insert(&self, conn: &mut DbConnection, record: &dyn Entity) -> Result<usize, DbmsError> {
        let author = downcast::<Author>(record)?;
        Ok(diesel::insert_into(authors::table).values(author).execute(conn)?)
    }

    fn delete(&self, conn: &mut DbConnection, record: &dyn Entity) -> Result<usize, DbmsError> {
        let author = downcast::<Author>(record)?;
        let affected = diesel::delete(authors::table.find(author.id)).execute(conn)?;
        expect_affected(affected, AUTHORS.table_name, record)
    }

    fn update(
        &self,
        conn: &mut DbConnection,
        original: &dyn Entity,
        updated: &dyn Entity,
    ) -> Result<usize, DbmsError> {
        let key = downcast::<Author>(original)?.id;
        let author = downcast::<Author>(updated)?;
        let affected = diesel::update(authors::table.find(key))
            .set((
                authors::id.eq(author.id),
                authors::name.eq(&author.name),
                authors::date_of_birth.eq(author.date_of_birth),
            ))
            .execute(conn)?;
        expect_affected(affected, AUTHORS.table_name, original)
    }
}
