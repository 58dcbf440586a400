//! Driver-neutral table definitions

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{RelixError, Result};

/// Name of the identity column every managed table carries
pub const ID_COLUMN: &str = "id";

/// Storage class of a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Integer,
    Real,
    /// Integer holding the identity of a row in the named table
    Reference(String),
}

/// One non-identity column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl Column {
    pub fn text(name: impl Into<String>) -> Self {
        Self::required(name, ColumnKind::Text)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::required(name, ColumnKind::Integer)
    }

    pub fn real(name: impl Into<String>) -> Self {
        Self::required(name, ColumnKind::Real)
    }

    pub fn reference(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self::required(name, ColumnKind::Reference(table.into()))
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn required(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }
}

/// A table: its name plus the columns beside the implicit `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    name: String,
    columns: Vec<Column>,
}

impl TableSchema {
    /// # Errors
    /// `InvalidInput` when the table or a column is not a plain identifier,
    /// a column is named `id`, or a column name repeats.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        let mut seen = std::collections::BTreeSet::new();
        for column in &columns {
            validate_identifier(&column.name)?;
            if column.name == ID_COLUMN || !seen.insert(column.name.as_str()) {
                return Err(RelixError::InvalidIdentifier {
                    name: format!("{}.{}", name, column.name),
                }
                .into());
            }
            if let ColumnKind::Reference(target) = &column.kind {
                validate_identifier(target)?;
            }
        }
        Ok(Self { name, columns })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == ID_COLUMN || self.column(name).is_some()
    }

    /// SHA-256 over the canonical JSON form of the definition
    pub fn checksum(&self) -> String {
        let canonical = serde_json::to_string(self).unwrap_or_else(|_| self.name.clone());
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`
///
/// # Errors
/// * `InvalidInput` - `name` does not match
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(RelixError::InvalidIdentifier {
            name: name.to_string(),
        }
        .into())
    }
}
