//! Storage driver boundary
//!
//! Everything the record layer needs from a backing store. Drivers own
//! dialect details; callers only see tables, rows and filters.

use crate::errors::Result;
use crate::model::{Identity, Row, RowSet, TableSchema, Value};

/// Conjunction of column equalities; empty matches every row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(column, value)
    }

    pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate against an in-memory row
    ///
    /// Missing columns never match. `Null` only matches `Null`.
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions
            .iter()
            .all(|(column, expected)| row.get(column) == Some(expected))
    }
}

/// Capabilities a backing store provides
///
/// Every table a driver manages has an integer `id` column whose values are
/// assigned by `insert`, increase monotonically and are not reused while the
/// table exists. `select` returns rows in ascending `id` order and includes
/// the `id` column in each row.
pub trait Driver {
    /// Short driver name for logs and reports
    fn name(&self) -> &'static str;

    /// Create the table if it does not exist
    ///
    /// # Errors
    /// * `Storage` - the definition was rejected
    fn create_table(&mut self, schema: &TableSchema) -> Result<()>;

    /// Drop the table if it exists
    ///
    /// # Errors
    /// * `Storage` - the driver failed
    fn drop_table(&mut self, table: &str) -> Result<()>;

    /// # Errors
    /// * `Storage` - the driver failed
    fn table_exists(&self, table: &str) -> Result<bool>;

    /// Insert a row (without `id`) and return the assigned identity
    ///
    /// # Errors
    /// * `Storage` - missing table, unknown column or violated constraint
    fn insert(&mut self, table: &str, row: &Row) -> Result<Identity>;

    /// Overwrite the columns present in `row`; returns rows affected
    ///
    /// # Errors
    /// * `Storage` - missing table, unknown column or violated constraint
    fn update(&mut self, table: &str, id: Identity, row: &Row) -> Result<usize>;

    /// # Errors
    /// * `Storage` - missing table or unknown filter column
    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>>;

    /// Returns rows removed
    ///
    /// # Errors
    /// * `Storage` - missing table, unknown filter column or violated constraint
    fn delete(&mut self, table: &str, filter: &Filter) -> Result<usize>;

    /// Run a statement in the driver's own dialect
    ///
    /// # Errors
    /// * `Storage` - a statement failed
    /// * `NotImplemented` - the driver has no raw dialect
    fn execute_raw(&mut self, statement: &str) -> Result<RowSet>;
}
