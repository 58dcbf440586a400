//! Driver implementations backed by SQLite

pub mod sqlite_driver;

pub use sqlite_driver::SqliteDriver;
