// Diesel table definitions for the bundled library schema.

diesel::table! {
    books (id) {
        id -> BigInt,
        title -> Text,
        description -> Text,
    }
}

diesel::table! {
    authors (id) {
        id -> BigInt,
        name -> Text,
        date_of_birth -> Timestamp,
    }
}

diesel::table! {
    book_authors (author_id, book_id) {
        book_id -> BigInt,
        author_id -> BigInt,
    }
}

diesel::joinable!(book_authors -> books (book_id));
diesel::joinable!(book_authors -> authors (author_id));

diesel::allow_tables_to_appear_in_same_query!(books, authors, book_authors);

/// DDL applied by `Database::initialize_schema` when the tables are missing.
pub const CREATE_TABLES_SQL: &str = "
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    date_of_birth TIMESTAMP NOT NULL
);
CREATE TABLE IF NOT EXISTS book_authors (
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE ON UPDATE CASCADE,
    author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE ON UPDATE CASCADE,
    PRIMARY KEY (author_id, book_id)
);
";
