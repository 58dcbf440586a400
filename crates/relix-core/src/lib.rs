//! relix core - records, pivot relations and the storage driver boundary
//!
//! - `Model` trait and `Pivot<L, R>` join records
//! - `Driver` trait plus an in-memory `MemoryDriver`
//! - `Database` context: save/find/delete, schema prepare/revert, relation
//!   queries
//! - Structured error and logging facilities shared by the other crates

pub mod database;
pub mod driver;
pub mod errors;
pub mod logging_facility;
pub mod memory;
pub mod model;
pub mod relation;
pub mod schema_manager;

// Used by the exported logging macros
#[doc(hidden)]
pub use relix_core_types;

pub use database::Database;
pub use driver::{Driver, Filter};
pub use errors::{ExError, ExErrorKind, RelixError, Result};
pub use memory::MemoryDriver;
pub use model::{Column, ForeignKey, Identity, Model, Pivot, RecordMeta, Row, RowSet, Value};
