// Integration tests for the SQLite driver behind the record layer

mod common;

use common::{prepare_all, setup_test_db, Author, Authorship, Book};
use relix_core::{Database, Driver, ExErrorKind, Model, Value};
use relix_store::SqliteDriver;

#[test]
fn test_save_and_find_round_trip() {
    // Given: a prepared database
    let mut db = setup_test_db();

    // When: a book with a NULL subtitle is saved
    let mut book = Book::new("Dune", 9.5);
    let id = db.save(&mut book).unwrap();

    // Then: it reads back field for field
    let found: Book = db.find(id).unwrap().unwrap();
    assert_eq!(found.title, "Dune");
    assert_eq!(found.subtitle, None);
    assert_eq!(found.price, 9.5);
    assert!(found.exists());
}

#[test]
fn test_update_writes_same_row() {
    let mut db = setup_test_db();
    let mut book = Book::new("Dune", 9.5);
    db.save(&mut book).unwrap();

    book.subtitle = Some("Deluxe".to_string());
    db.save(&mut book).unwrap();

    assert_eq!(db.count::<Book>().unwrap(), 1);
    let found: Book = db.find(book.id().unwrap()).unwrap().unwrap();
    assert_eq!(found.subtitle.as_deref(), Some("Deluxe"));
}

#[test]
fn test_identities_not_reused_after_delete() {
    let mut db = setup_test_db();
    let mut first = Author::new("Le Guin");
    let mut second = Author::new("Herbert");
    db.save(&mut first).unwrap();
    db.save(&mut second).unwrap();
    db.delete(&mut second).unwrap();

    let mut third = Author::new("Banks");
    let id = db.save(&mut third).unwrap();
    assert_eq!(id.get(), 3);
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    let id = {
        let mut db = Database::new(SqliteDriver::open(&path).unwrap());
        prepare_all(&mut db);
        db.save(&mut Author::new("Le Guin")).unwrap()
    };

    let mut db = Database::new(SqliteDriver::open(&path).unwrap());
    prepare_all(&mut db);
    let found: Author = db.find(id).unwrap().unwrap();
    assert_eq!(found.name, "Le Guin");
}

#[test]
fn test_relations_on_sqlite() {
    let mut db = setup_test_db();
    let mut herbert = Author::new("Herbert");
    let mut dune = Book::new("Dune", 9.5);
    let mut messiah = Book::new("Dune Messiah", 8.0);
    db.save(&mut herbert).unwrap();
    db.save(&mut messiah).unwrap();
    db.save(&mut dune).unwrap();

    db.attach(&herbert, &dune).unwrap();
    db.attach(&herbert, &messiah).unwrap();

    let books: Vec<Book> = db.related(&herbert).unwrap();
    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Dune Messiah"]);

    let authors: Vec<Author> = db.related(&dune).unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "Herbert");
}

#[test]
fn test_sqlite_enforces_join_row_references() {
    let mut db = setup_test_db();
    let mut herbert = Author::new("Herbert");
    let mut dune = Book::new("Dune", 9.5);
    db.save(&mut herbert).unwrap();
    db.save(&mut dune).unwrap();
    db.attach(&herbert, &dune).unwrap();

    // deleting a referenced row violates the join table's foreign key
    let err = db.delete(&mut dune).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Storage);
    assert!(err.message().contains("FOREIGN KEY"));
    assert!(dune.exists());
}

#[test]
fn test_revert_in_reverse_order_drops_everything() {
    let mut db = setup_test_db();
    let mut herbert = Author::new("Herbert");
    let mut dune = Book::new("Dune", 9.5);
    db.save(&mut herbert).unwrap();
    db.save(&mut dune).unwrap();
    db.attach(&herbert, &dune).unwrap();

    db.revert::<Authorship>().unwrap();
    db.revert::<Book>().unwrap();
    db.revert::<Author>().unwrap();

    for table in ["author_book", "books", "authors"] {
        assert!(!db.driver().table_exists(table).unwrap(), "{}", table);
    }
    assert!(!db.is_prepared::<Author>().unwrap());
}

#[test]
fn test_schema_ledger_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    {
        let mut db = Database::new(SqliteDriver::open(&path).unwrap());
        db.prepare::<Author>().unwrap();
    }

    let db = Database::new(SqliteDriver::open(&path).unwrap());
    assert!(db.is_prepared::<Author>().unwrap());
    assert!(!db.is_prepared::<Book>().unwrap());
}

#[test]
fn test_raw_statement_reports_version() {
    let mut db = Database::new(SqliteDriver::open_in_memory().unwrap());
    let set = db.raw("SELECT sqlite_version() AS version").unwrap();

    assert_eq!(set.columns, vec!["version".to_string()]);
    assert_eq!(set.len(), 1);
    match set.scalar() {
        Some(Value::Text(version)) => assert!(version.starts_with('3')),
        other => panic!("unexpected version value: {:?}", other),
    }
}

#[test]
fn test_raw_syntax_error_is_storage() {
    let mut db = Database::new(SqliteDriver::open_in_memory().unwrap());
    let err = db.raw("SELEC nonsense").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Storage);
    assert_eq!(err.op(), Some("execute_raw"));
}

#[test]
fn test_raw_runs_every_statement_in_order() {
    // Given: an empty database
    let mut db = Database::new(SqliteDriver::open_in_memory().unwrap());

    // When: one raw call carries two DDL statements and a query
    let set = db
        .raw("CREATE TABLE shelves (label TEXT); CREATE TABLE bins (slot INTEGER); SELECT 7 AS n")
        .unwrap();

    // Then: both tables exist and the last statement's rows come back
    assert!(db.driver().table_exists("shelves").unwrap());
    assert!(db.driver().table_exists("bins").unwrap());
    assert_eq!(set.columns, vec!["n".to_string()]);
    assert_eq!(set.rows[0].get("n"), Some(&Value::Integer(7)));
}

#[test]
fn test_raw_stops_at_first_failing_statement() {
    let mut db = Database::new(SqliteDriver::open_in_memory().unwrap());
    let err = db
        .raw("CREATE TABLE shelves (label TEXT); SELEC nonsense; CREATE TABLE bins (slot INTEGER)")
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Storage);
    assert!(db.driver().table_exists("shelves").unwrap());
    assert!(!db.driver().table_exists("bins").unwrap());
}

#[test]
fn test_prepare_refuses_table_created_outside_relix() {
    // Given: an authors table made by hand with an unrelated layout
    let mut db = Database::new(SqliteDriver::open_in_memory().unwrap());
    db.raw("CREATE TABLE authors (id INTEGER PRIMARY KEY, legacy TEXT)")
        .unwrap();

    // When: the model is prepared over it
    let err = db.prepare::<Author>().unwrap_err();

    // Then: nothing is recorded and the table is left alone
    assert_eq!(err.kind(), ExErrorKind::SchemaDrift);
    assert!(!db.is_prepared::<Author>().unwrap());
    let columns = db.raw("SELECT * FROM authors").unwrap().columns;
    assert_eq!(columns, vec!["id".to_string(), "legacy".to_string()]);
}
