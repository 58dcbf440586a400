//! Error handling for relix-store
//!
//! Maps rusqlite failures onto the relix-core error facility

use relix_core::errors::{storage_error, ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Storage error for a failed SQLite call made by `op`
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> ExError {
    storage_error(op, err.to_string())
}

/// Column holding a value relix cannot represent
pub fn unsupported_value(column: &str, what: &str) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("decode")
        .with_message(format!("column '{}' holds {}", column, what))
}
