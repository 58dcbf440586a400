//! relix store - SQLite backing for relix records
//!
//! Provides:
//! - Connection management with foreign keys and WAL enabled
//! - DDL and statement generation from driver-neutral table definitions
//! - `SqliteDriver`, the `Driver` implementation over a rusqlite connection

pub mod db;
pub mod ddl;
pub mod driver;
pub mod errors;
pub mod values;

pub use driver::SqliteDriver;
pub use errors::Result;
