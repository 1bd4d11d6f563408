//! Bundled library schema: books, authors, and the link table between them.
//!
//! This is the only place that names concrete tables. Registering another
//! table means adding its module here and listing it in [`descriptors`] and
//! [`TABLE_STORES`].

pub mod author;
pub mod book;
pub mod book_author;

pub use author::{Author, AuthorTable, AUTHORS};
pub use book::{Book, BookTable, BOOKS};
pub use book_author::{BookAuthor, BookAuthorTable, BOOK_AUTHORS};

use crate::catalog::{Catalog, EntityDescriptor};
use crate::diesel_runtime::TableStore;
use crate::error::DbmsError;

/// Every bundled table in menu order
pub fn descriptors() -> [&'static EntityDescriptor; 3] {
    [&BOOKS, &AUTHORS, &BOOK_AUTHORS]
}

/// Diesel adapters for every bundled table
pub static TABLE_STORES: &[&dyn TableStore] = &[&BookTable, &AuthorTable, &BookAuthorTable];

/// Catalog over the bundled schema
pub fn catalog() -> Result<Catalog, DbmsError> {
    Catalog::new(descriptors())
}
