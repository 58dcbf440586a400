//! Scalar values and rows exchanged with storage drivers

use serde::Serialize;
use std::fmt;

use crate::errors::{RelixError, Result};
use crate::model::identity::Identity;
use crate::model::table::ID_COLUMN;

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Identity> for Value {
    fn from(id: Identity) -> Self {
        Value::Integer(id.get())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Ordered column/value pairs
///
/// `table` names the table a row was read from and only feeds error
/// messages; it does not take part in equality.
#[derive(Debug, Clone, Default)]
pub struct Row {
    table: Option<String>,
    fields: Vec<(String, Value)>,
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty row tagged with the table it belongs to
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            fields: Vec::new(),
        }
    }

    /// Builder form of [`Row::set`]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a column, replacing any earlier value for it
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy without the identity column, as used for writes
    pub fn without_id(&self) -> Row {
        Row {
            table: self.table.clone(),
            fields: self
                .fields
                .iter()
                .filter(|(c, _)| c != ID_COLUMN)
                .cloned()
                .collect(),
        }
    }

    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or("row")
    }

    fn require(&self, column: &str) -> Result<&Value> {
        self.get(column).ok_or_else(|| {
            RelixError::MissingColumn {
                entity: self.table().to_string(),
                column: column.to_string(),
            }
            .into()
        })
    }

    fn mismatch(&self, column: &str, expected: &'static str) -> crate::errors::ExError {
        RelixError::TypeMismatch {
            entity: self.table().to_string(),
            column: column.to_string(),
            expected,
        }
        .into()
    }

    /// # Errors
    /// * `Serialization` - the column is absent or not text
    pub fn text(&self, column: &str) -> Result<String> {
        match self.require(column)? {
            Value::Text(v) => Ok(v.clone()),
            _ => Err(self.mismatch(column, "text")),
        }
    }

    /// # Errors
    /// * `Serialization` - the column is absent or not integer
    pub fn integer(&self, column: &str) -> Result<i64> {
        match self.require(column)? {
            Value::Integer(v) => Ok(*v),
            _ => Err(self.mismatch(column, "integer")),
        }
    }

    /// Reads a REAL column; integers widen since SQLite may store whole
    /// floats with integer affinity
    ///
    /// # Errors
    /// * `Serialization` - the column is absent or not numeric
    pub fn real(&self, column: &str) -> Result<f64> {
        match self.require(column)? {
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            _ => Err(self.mismatch(column, "real")),
        }
    }

    /// # Errors
    /// * `Serialization` - the column is absent or not integer
    pub fn identity(&self, column: &str) -> Result<Identity> {
        self.integer(column).map(Identity::new)
    }

    /// Nullable reference column
    ///
    /// # Errors
    /// * `Serialization` - the column is absent or neither NULL nor integer
    pub fn optional_identity(&self, column: &str) -> Result<Option<Identity>> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Integer(v) => Ok(Some(Identity::new(*v))),
            _ => Err(self.mismatch(column, "integer")),
        }
    }

    /// The row's own identity (`id` column)
    ///
    /// # Errors
    /// * `Serialization` - the row has no integer `id`
    pub fn id(&self) -> Result<Identity> {
        self.identity(ID_COLUMN)
    }
}

/// Result of a raw statement
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column of the first row, the common shape of probe queries
    pub fn scalar(&self) -> Option<&Value> {
        let column = self.columns.first()?;
        self.rows.first()?.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_set_replaces_existing_column() {
        let mut row = Row::new().with("name", "Hydrogen").with("protons", 1);
        row.set("name", "Helium");

        assert_eq!(row.len(), 2);
        assert_eq!(row.text("name").unwrap(), "Helium");
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["name", "protons"]);
    }

    #[test]
    fn test_missing_column_is_serialization_error() {
        let row = Row::for_table("atoms").with("name", "Hydrogen");
        let err = row.integer("protons").unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert_eq!(err.entity(), Some("atoms"));
    }

    #[test]
    fn test_type_mismatch() {
        let row = Row::new().with("protons", "one");
        let err = row.integer("protons").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert!(err.message().contains("not integer"));
    }

    #[test]
    fn test_real_accepts_integer_storage() {
        let row = Row::new().with("weight", 12);
        assert_eq!(row.real("weight").unwrap(), 12.0);
    }

    #[test]
    fn test_without_id_drops_identity() {
        let row = Row::new().with(ID_COLUMN, 5).with("name", "Water");
        let stripped = row.without_id();
        assert!(stripped.get(ID_COLUMN).is_none());
        assert_eq!(stripped.len(), 1);
    }

    #[test]
    fn test_equality_ignores_table_tag() {
        let a = Row::for_table("atoms").with("name", "Carbon");
        let b = Row::new().with("name", "Carbon");
        assert_eq!(a, b);
    }

    #[test]
    fn test_rowset_scalar() {
        let set = RowSet {
            columns: vec!["v".to_string()],
            rows: vec![Row::new().with("v", "3.45.0")],
        };
        assert_eq!(set.scalar(), Some(&Value::Text("3.45.0".to_string())));
        assert_eq!(RowSet::default().scalar(), None);
    }

    #[test]
    fn test_row_serializes_as_map() {
        let row = Row::new().with("name", "Water").with("id", 2);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Water", "id": 2}));
    }
}
