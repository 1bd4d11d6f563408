//! End-to-end menu flows driven by a scripted console over the memory store

use entity_console::models::{self, Author, Book};
use entity_console::{App, Catalog, MemoryStore, Record, ScriptedConsole};
use std::fs;

fn setup() -> (Catalog, MemoryStore) {
    let catalog = models::catalog().expect("bundled catalog is valid");
    let store = MemoryStore::new(&catalog);
    (catalog, store)
}

fn run(catalog: &Catalog, store: &MemoryStore, page_size: usize, script: &[&str]) -> ScriptedConsole {
    let mut console = ScriptedConsole::new(script.iter().copied());
    App::new(catalog, store, page_size)
        .run(&mut console)
        .expect("script ends with Exit");
    assert_eq!(console.remaining(), 0, "script not fully consumed");
    console
}

fn as_author(record: &Record) -> &Author {
    record.as_any().downcast_ref::<Author>().expect("author record")
}

fn as_book(record: &Record) -> &Book {
    record.as_any().downcast_ref::<Book>().expect("book record")
}

/// Menu script creating one author, acknowledged with Return
fn create_author<'a>(id: &'a str, name: &'a str, born: &'a str) -> Vec<&'a str> {
    vec!["1", "2", id, name, born, "1"]
}

#[test]
fn test_create_author() {
    let (catalog, store) = setup();

    let mut script = create_author("3", "Mary Shelley", "1797-08-30 00:00:00");
    script.push("6");
    let console = run(&catalog, &store, 10, &script);

    assert!(console.saw("You selected the table: Authors"));
    assert!(console.saw("Please enter the DateOfBirth"));
    assert!(console.saw("Successfully inserted data into table"));

    let authors = store.snapshot("Authors");
    assert_eq!(authors.len(), 1);
    let author = as_author(&authors[0]);
    assert_eq!(author.id, 3);
    assert_eq!(author.name, "Mary Shelley");
}

#[test]
fn test_create_reprompts_until_value_coerces() {
    let (catalog, store) = setup();

    let console = run(
        &catalog,
        &store,
        10,
        &["1", "1", "abc", "99999999999999999999", "7", "Emma", "", "1", "6"],
    );

    assert!(console.saw("Input 'abc' not correct type, expecting Integer"));
    assert!(console.saw("Input '99999999999999999999' not correct type"));

    let books = store.snapshot("Books");
    let book = as_book(&books[0]);
    assert_eq!(book.id, 7);
    assert_eq!(book.description, "");
}

#[test]
fn test_read_pages_forward_and_returns() {
    let (catalog, store) = setup();

    let mut script = Vec::new();
    script.extend(create_author("1", "Jane Austen", "1775-12-16 00:00:00"));
    script.extend(create_author("2", "Mary Shelley", "1797-08-30 00:00:00"));
    script.extend(create_author("3", "Charles Dickens", "1812-02-07 00:00:00"));
    // Read Authors: page 1 offers Next, Return; page 2 offers Previous, Return
    script.extend(["2", "2", "1", "2", "6"]);

    let console = run(&catalog, &store, 2, &script);
    let output = console.output();

    let first = output
        .iter()
        .position(|line| line == "Id: 1 Name: Jane Austen DateOfBirth: 1775-12-16 00:00:00")
        .expect("first page shown");
    let third = output
        .iter()
        .position(|line| line == "Id: 3 Name: Charles Dickens DateOfBirth: 1812-02-07 00:00:00")
        .expect("second page shown");
    assert!(first < third);

    assert!(console.saw("Page 1 of 2"));
    assert!(console.saw("Displaying Next"));
    assert!(console.saw("Display Previous"));
    assert!(!console.saw("Displaying Previous"));
}

#[test]
fn test_read_empty_table_offers_only_return() {
    let (catalog, store) = setup();
    let console = run(&catalog, &store, 10, &["2", "1", "1", "6"]);

    assert!(console.saw("1. Return"));
    assert!(!console.saw("Display Next"));
}

#[test]
fn test_update_changes_chosen_field_only() {
    let (catalog, store) = setup();

    let mut script = create_author("1", "Jane Austen", "1775-12-16 00:00:00");
    // Update Authors, first entry, Name, then DateOfBirth with one bad try
    script.extend([
        "3", "2", "1", "2", "J. Austen", "1", "3", "tomorrow", "1775-12-17 00:00:00", "2", "1",
        "6",
    ]);
    let console = run(&catalog, &store, 10, &script);

    assert!(console.saw("Input not correct type, expecting DateTime"));
    assert!(console.saw("Are there any more changes you'd like to make?"));
    assert!(console.saw("Successfully updated entry."));

    let authors = store.snapshot("Authors");
    let author = as_author(&authors[0]);
    assert_eq!(author.id, 1);
    assert_eq!(author.name, "J. Austen");
    assert_eq!(author.date_of_birth.to_string(), "1775-12-17 00:00:00");
}

fn three_authors() -> Vec<&'static str> {
    let mut script = Vec::new();
    script.extend(create_author("1", "Jane Austen", "1775-12-16 00:00:00"));
    script.extend(create_author("2", "Mary Shelley", "1797-08-30 00:00:00"));
    script.extend(create_author("3", "Charles Dickens", "1812-02-07 00:00:00"));
    script
}

fn author_names(store: &MemoryStore) -> Vec<String> {
    store
        .snapshot("Authors")
        .iter()
        .map(|record| as_author(record).name.clone())
        .collect()
}

#[test]
fn test_delete_removes_the_displayed_entry() {
    let (catalog, store) = setup();

    let mut script = three_authors();
    // Delete, Authors, second listed entry, acknowledge
    script.extend(["4", "2", "2", "1", "6"]);
    let console = run(&catalog, &store, 10, &script);

    assert!(console.saw("2. Id: 2 Name: Mary Shelley DateOfBirth: 1797-08-30 00:00:00"));
    assert!(console.saw("Entry successfully removed."));
    assert_eq!(author_names(&store), vec!["Jane Austen", "Charles Dickens"]);
}

#[test]
fn test_update_changes_the_displayed_entry() {
    let (catalog, store) = setup();

    let mut script = three_authors();
    // Update, Authors, second listed entry, Name, no more changes, acknowledge
    script.extend(["3", "2", "2", "2", "Mary Wollstonecraft Shelley", "2", "1", "6"]);
    run(&catalog, &store, 10, &script);

    assert_eq!(
        author_names(&store),
        vec!["Jane Austen", "Mary Wollstonecraft Shelley", "Charles Dickens"]
    );
    let authors = store.snapshot("Authors");
    assert_eq!(as_author(&authors[1]).id, 2);
    assert_eq!(as_author(&authors[1]).date_of_birth.to_string(), "1797-08-30 00:00:00");
}

#[test]
fn test_return_from_record_picker_changes_nothing() {
    let (catalog, store) = setup();

    let mut script = create_author("1", "Jane Austen", "1775-12-16 00:00:00");
    // Delete, Authors, then Return (second option after one record)
    script.extend(["4", "2", "2", "6"]);
    run(&catalog, &store, 10, &script);

    assert_eq!(store.count("Authors"), 1);
}

#[test]
fn test_import_from_file_reports_and_continues() {
    let (catalog, store) = setup();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("insert_data.txt");
    fs::write(
        &path,
        "TableName: Authors\nId: 1\nName: Jane Austen\nDateOfBirth: 1775-12-16 00:00:00\n\n\
         TableName: Magazines\nId: 4\n\n\
         TableName: Books\nId: one\nTitle: Emma: A Novel\nDescription: Highbury\n",
    )
    .unwrap();

    let path_text = path.to_string_lossy().into_owned();
    let console = run(&catalog, &store, 10, &["5", &path_text, "1", "6"]);

    assert!(console.saw("Couldn't find table 'Magazines'"));
    assert!(console.saw("Record at line 1 successfully inserted into Authors"));
    assert!(console.saw("Import finished: 2 inserted, 0 failed, 3 lines skipped"));

    let books = store.snapshot("Books");
    assert_eq!(as_book(&books[0]).title, "Emma: A Novel");
    assert_eq!(as_book(&books[0]).id, 0);
    assert_eq!(store.count("Authors"), 1);
}

#[test]
fn test_missing_import_file_is_reported() {
    let (catalog, store) = setup();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt").to_string_lossy().into_owned();

    let console = run(&catalog, &store, 10, &["5", &missing, "1", "6"]);

    assert!(console.saw("Cannot import data from"));
    assert!(console.saw("Welcome to the DBMS"));
}

#[test]
fn test_invalid_menu_choice_reprompts() {
    let (catalog, store) = setup();
    let console = run(&catalog, &store, 10, &["9", "exit", "6"]);
    assert!(console.saw("Please enter a number between 1 and 6"));
}

#[test]
fn test_closed_input_ends_run_with_console_error() {
    let (catalog, store) = setup();
    let mut console = ScriptedConsole::new(["1", "2", "5"]);

    let err = App::new(&catalog, &store, 10).run(&mut console).unwrap_err();
    assert!(err.is_console_closed());
    assert_eq!(store.count("Authors"), 0);
}
