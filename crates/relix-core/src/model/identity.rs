//! Record identity and persistence state

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{RelixError, Result};

/// Storage-assigned key of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(i64);

impl Identity {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Identity {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Identity and existence flag carried by every record
///
/// The identity is set once, on first save, and never changes afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordMeta {
    id: Option<Identity>,
    exists: bool,
}

impl RecordMeta {
    /// State of a freshly constructed, never saved record
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a record just read back from storage
    pub fn loaded(id: Identity) -> Self {
        Self {
            id: Some(id),
            exists: true,
        }
    }

    pub fn id(&self) -> Option<Identity> {
        self.id
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Record the identity handed out by storage
    ///
    /// # Errors
    /// `IdentityReassigned` if a different identity is already set.
    pub(crate) fn assign(&mut self, entity: &str, id: Identity) -> Result<()> {
        match self.id {
            Some(existing) if existing != id => Err(RelixError::IdentityReassigned {
                entity: entity.to_string(),
                existing,
                attempted: id,
            }
            .into()),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    pub(crate) fn mark_exists(&mut self, exists: bool) {
        self.exists = exists;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_new_meta_is_unsaved() {
        let meta = RecordMeta::new();
        assert_eq!(meta.id(), None);
        assert!(!meta.exists());
    }

    #[test]
    fn test_assign_is_idempotent_for_same_identity() {
        let mut meta = RecordMeta::new();
        meta.assign("atoms", Identity::new(3)).unwrap();
        meta.assign("atoms", Identity::new(3)).unwrap();
        assert_eq!(meta.id(), Some(Identity::new(3)));
    }

    #[test]
    fn test_assign_rejects_different_identity() {
        let mut meta = RecordMeta::loaded(Identity::new(3));
        let err = meta.assign("atoms", Identity::new(4)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Internal);
        assert_eq!(meta.id(), Some(Identity::new(3)));
    }
}
