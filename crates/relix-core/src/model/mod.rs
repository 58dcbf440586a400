//! Record model: values, rows, identities, table definitions and the
//! `Model` trait implemented by every persistable type

pub mod identity;
pub mod pivot;
pub mod record;
pub mod table;
pub mod value;

pub use identity::{Identity, RecordMeta};
pub use pivot::Pivot;
pub use record::{ForeignKey, Model};
pub use table::{Column, ColumnKind, TableSchema, ID_COLUMN};
pub use value::{Row, RowSet, Value};
