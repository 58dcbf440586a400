//! The `Model` trait: what a type provides to be saved, found and related

use crate::errors::Result;
use crate::model::identity::{Identity, RecordMeta};
use crate::model::table::{Column, TableSchema};
use crate::model::value::Row;

/// A foreign key held by a record, checked before every write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    /// Table the key points into
    pub target: String,
    pub id: Option<Identity>,
}

/// A persistable record type
///
/// Implementors keep a [`RecordMeta`] and convert themselves to and from a
/// [`Row`]. The row passed to `from_row` always includes the `id` column.
pub trait Model: Sized {
    /// Singular name, also the prefix of foreign-key columns (`atom` → `atom_id`)
    fn name() -> String;

    /// Table name
    fn entity() -> String {
        format!("{}s", Self::name())
    }

    /// Columns other than `id`
    fn columns() -> Vec<Column>;

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Column values to write, without `id`
    fn to_row(&self) -> Row;

    /// # Errors
    /// * `Serialization` - a column is missing or holds the wrong kind of value
    fn from_row(row: &Row) -> Result<Self>;

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        Vec::new()
    }

    /// Model-specific checks run by `prepare` before any storage is touched
    ///
    /// # Errors
    /// * `InvalidInput` - the model cannot be stored
    fn validate_schema() -> Result<()> {
        Ok(())
    }

    /// # Errors
    /// * `InvalidInput` - the entity or a column is not a plain identifier
    fn schema() -> Result<TableSchema> {
        TableSchema::new(Self::entity(), Self::columns())
    }

    /// Column in other tables that references this model
    fn foreign_key_column() -> String {
        format!("{}_id", Self::name())
    }

    fn id(&self) -> Option<Identity> {
        self.meta().id()
    }

    fn exists(&self) -> bool {
        self.meta().exists()
    }
}
