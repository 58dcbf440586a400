//! Conversion between relix values and SQLite values

use relix_core::Value;
use rusqlite::types::{Value as SqlValue, ValueRef};

use crate::errors::{unsupported_value, Result};

pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

/// Blobs and non-UTF-8 text are refused
///
/// # Errors
/// * `Serialization` - the value is a blob or invalid UTF-8
pub fn from_sql(column: &str, value: ValueRef<'_>) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Integer(i)),
        ValueRef::Real(f) => Ok(Value::Real(f)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_string()))
            .map_err(|_| unsupported_value(column, "text that is not valid UTF-8")),
        ValueRef::Blob(_) => Err(unsupported_value(column, "a blob")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relix_core::ExErrorKind;

    #[test]
    fn test_text_decodes() {
        let v = from_sql("name", ValueRef::Text(b"Water")).unwrap();
        assert_eq!(v, Value::Text("Water".to_string()));
    }

    #[test]
    fn test_blob_refused() {
        let err = from_sql("payload", ValueRef::Blob(&[0, 1])).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert!(err.message().contains("payload"));
    }
}
