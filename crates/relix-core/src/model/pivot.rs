//! Many-to-many join rows
//!
//! `Pivot<L, R>` stores one row per (left, right) link. The table name and
//! column order are derived from the two names sorted, so `Pivot<A, B>` and
//! `Pivot<B, A>` address the same table with the same definition.

use std::fmt;
use std::marker::PhantomData;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::identity::{Identity, RecordMeta};
use crate::model::record::{ForeignKey, Model};
use crate::model::table::Column;
use crate::model::value::Row;

pub struct Pivot<L, R> {
    meta: RecordMeta,
    left_id: Option<Identity>,
    right_id: Option<Identity>,
    _sides: PhantomData<fn() -> (L, R)>,
}

impl<L: Model, R: Model> Pivot<L, R> {
    /// Link two records by their identities as they are right now
    ///
    /// Unsaved records are accepted here; saving the pivot then fails.
    pub fn new(left: &L, right: &R) -> Self {
        Self::from_ids(left.id(), right.id())
    }

    pub fn from_ids(left_id: Option<Identity>, right_id: Option<Identity>) -> Self {
        Self {
            meta: RecordMeta::new(),
            left_id,
            right_id,
            _sides: PhantomData,
        }
    }

    pub fn left_id(&self) -> Option<Identity> {
        self.left_id
    }

    pub fn right_id(&self) -> Option<Identity> {
        self.right_id
    }

    /// Point the pivot at different records; takes effect on the next save
    pub fn relink(&mut self, left: &L, right: &R) {
        self.left_id = left.id();
        self.right_id = right.id();
    }

    fn left_first() -> bool {
        L::name() <= R::name()
    }
}

impl<L: Model, R: Model> Model for Pivot<L, R> {
    fn name() -> String {
        if Self::left_first() {
            format!("{}_{}", L::name(), R::name())
        } else {
            format!("{}_{}", R::name(), L::name())
        }
    }

    /// Join tables keep the joined name unpluralised
    fn entity() -> String {
        Self::name()
    }

    fn columns() -> Vec<Column> {
        let left = Column::reference(L::foreign_key_column(), L::entity());
        let right = Column::reference(R::foreign_key_column(), R::entity());
        if Self::left_first() {
            vec![left, right]
        } else {
            vec![right, left]
        }
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn to_row(&self) -> Row {
        Row::for_table(Self::entity())
            .with(L::foreign_key_column(), self.left_id)
            .with(R::foreign_key_column(), self.right_id)
    }

    fn from_row(row: &Row) -> Result<Self> {
        let mut pivot = Self::from_ids(
            row.optional_identity(&L::foreign_key_column())?,
            row.optional_identity(&R::foreign_key_column())?,
        );
        pivot.meta = RecordMeta::loaded(row.id()?);
        Ok(pivot)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey {
                column: L::foreign_key_column(),
                target: L::entity(),
                id: self.left_id,
            },
            ForeignKey {
                column: R::foreign_key_column(),
                target: R::entity(),
                id: self.right_id,
            },
        ]
    }

    fn validate_schema() -> Result<()> {
        if L::name() == R::name() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_entity(Self::entity())
                .with_message("a pivot needs two distinct record types"));
        }
        Ok(())
    }
}

impl<L, R> Clone for Pivot<L, R> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta,
            left_id: self.left_id,
            right_id: self.right_id,
            _sides: PhantomData,
        }
    }
}

impl<L, R> fmt::Debug for Pivot<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pivot")
            .field("id", &self.meta.id())
            .field("left_id", &self.left_id)
            .field("right_id", &self.right_id)
            .finish()
    }
}
