use thiserror::Error;

use crate::model::Identity;

/// Result type alias using the canonical ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code that tests and the CLI report can match
/// on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,

    // Storage
    Storage,
    NotFound,
    SchemaDrift,

    // Relations
    Referential,

    // Encoding
    Serialization,

    // Harness
    AssertionFailed,

    /// A capability the active driver does not provide
    NotImplemented,

    Io,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Storage => "ERR_STORAGE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::SchemaDrift => "ERR_SCHEMA_DRIFT",
            ExErrorKind::Referential => "ERR_REFERENTIAL",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::AssertionFailed => "ERR_ASSERTION_FAILED",
            ExErrorKind::NotImplemented => "ERR_NOT_IMPLEMENTED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields drive programmatic handling; the context fields
/// (`op`, `entity`, `record_id`) are for humans reading a failed scenario.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    record_id: Option<Identity>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            record_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity (table) context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add record identity context
    pub fn with_record_id(mut self, id: Identity) -> Self {
        self.record_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Fill in the operation only if none was recorded closer to the failure
    pub fn or_op(mut self, op: impl Into<String>) -> Self {
        if self.op.is_none() {
            self.op = Some(op.into());
        }
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn record_id(&self) -> Option<Identity> {
        self.record_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(id) = self.record_id {
            write!(f, " (record_id: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain failures raised by the record and relation layers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelixError {
    /// A foreign key was left unset when the record was written
    #[error("{entity}.{column} references a record that has not been saved")]
    UnpersistedReference { entity: String, column: String },

    /// A foreign key points at an identity with no row behind it
    #[error("{entity}.{column} references missing {target} row {id}")]
    DanglingReference {
        entity: String,
        column: String,
        target: String,
        id: Identity,
    },

    /// Relation traversal started from a record with no identity
    #[error("cannot traverse relations of an unsaved {entity}")]
    UnpersistedSource { entity: String },

    /// Column absent from a row being decoded
    #[error("column '{column}' missing from {entity} row")]
    MissingColumn { entity: String, column: String },

    /// Column present but holding the wrong kind of value
    #[error("column '{column}' of {entity} row is not {expected}")]
    TypeMismatch {
        entity: String,
        column: String,
        expected: &'static str,
    },

    /// Table or column name unusable as an SQL identifier
    #[error("invalid identifier '{name}'")]
    InvalidIdentifier { name: String },

    /// Stored table definition disagrees with the model's current one
    #[error("schema for {entity} changed: prepared with {recorded}, model now {current}")]
    SchemaDrift {
        entity: String,
        recorded: String,
        current: String,
    },

    /// Table exists in storage but was never recorded in the schema ledger
    #[error("table {entity} exists but was not prepared by relix")]
    UnmanagedTable { entity: String },

    /// An identity already assigned was about to be replaced
    #[error("identity {existing} of {entity} cannot be reassigned to {attempted}")]
    IdentityReassigned {
        entity: String,
        existing: Identity,
        attempted: Identity,
    },

    /// The record was expected in storage but the write touched no row
    #[error("{entity} row {id} no longer exists")]
    RowVanished { entity: String, id: Identity },

    /// Operation needs a saved record
    #[error("{entity} has not been saved")]
    NotPersisted { entity: String },
}

impl From<RelixError> for ExError {
    fn from(err: RelixError) -> Self {
        let message = err.to_string();
        match err {
            RelixError::UnpersistedReference { entity, .. }
            | RelixError::UnpersistedSource { entity } => {
                ExError::new(ExErrorKind::Referential)
                    .with_entity(entity)
                    .with_message(message)
            }
            RelixError::DanglingReference { entity, id, .. } => {
                ExError::new(ExErrorKind::Referential)
                    .with_entity(entity)
                    .with_record_id(id)
                    .with_message(message)
            }
            RelixError::MissingColumn { entity, .. } | RelixError::TypeMismatch { entity, .. } => {
                ExError::new(ExErrorKind::Serialization)
                    .with_entity(entity)
                    .with_message(message)
            }
            RelixError::InvalidIdentifier { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            RelixError::SchemaDrift { entity, .. } | RelixError::UnmanagedTable { entity } => {
                ExError::new(ExErrorKind::SchemaDrift)
                    .with_entity(entity)
                    .with_message(message)
            }
            RelixError::IdentityReassigned {
                entity, existing, ..
            } => ExError::new(ExErrorKind::Internal)
                .with_entity(entity)
                .with_record_id(existing)
                .with_message(message),
            RelixError::RowVanished { entity, id } => ExError::new(ExErrorKind::NotFound)
                .with_entity(entity)
                .with_record_id(id)
                .with_message(message),
            RelixError::NotPersisted { entity } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity(entity)
                .with_message(message),
        }
    }
}

/// Build a storage error for a driver operation
pub fn storage_error(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Storage)
        .with_op(op.to_string())
        .with_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::Storage,
            ExErrorKind::NotFound,
            ExErrorKind::SchemaDrift,
            ExErrorKind::Referential,
            ExErrorKind::Serialization,
            ExErrorKind::AssertionFailed,
            ExErrorKind::NotImplemented,
            ExErrorKind::Io,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::Storage)
            .with_op("save")
            .with_entity("atoms")
            .with_record_id(Identity::new(7))
            .with_message("no such table: atoms");

        assert_eq!(
            err.to_string(),
            "[ERR_STORAGE] in operation 'save': no such table: atoms (entity: atoms) (record_id: 7)"
        );
    }

    #[test]
    fn test_or_op_keeps_inner_operation() {
        let err = storage_error("insert", "boom").or_op("save");
        assert_eq!(err.op(), Some("insert"));

        let err = ExError::new(ExErrorKind::Internal).or_op("save");
        assert_eq!(err.op(), Some("save"));
    }
}
