//! Relation queries across pivot tables
//!
//! Traversal always starts from one side: select the join rows whose column
//! for that side matches the source identity, in ascending pivot identity,
//! then resolve the opposite column to full records.

use crate::database::{observe, Database};
use crate::driver::{Driver, Filter};
use crate::errors::{RelixError, Result};
use crate::model::{Model, Pivot};

impl<D: Driver> Database<D> {
    /// Records of type `T` linked to `source` through `Pivot<S, T>`
    ///
    /// Ordered by when each link was saved; a record linked twice appears
    /// twice.
    ///
    /// # Errors
    /// * `Referential` - `source` is unsaved, or a join row points at a
    ///   missing `T`
    pub fn related<S: Model, T: Model>(&self, source: &S) -> Result<Vec<T>> {
        let pivot = Pivot::<S, T>::entity();
        observe("related", &pivot, || {
            let source_id = source.id().ok_or_else(|| RelixError::UnpersistedSource {
                entity: S::entity(),
            })?;

            let target_entity = T::entity();
            let target_column = T::foreign_key_column();
            let rows = self
                .driver
                .select(&pivot, &Filter::eq(S::foreign_key_column(), source_id))?;

            let mut related = Vec::with_capacity(rows.len());
            for row in &rows {
                let target_id = row.identity(&target_column)?;
                let target = self
                    .find_impl::<T>(&target_entity, target_id)?
                    .ok_or_else(|| RelixError::DanglingReference {
                        entity: pivot.clone(),
                        column: target_column.clone(),
                        target: target_entity.clone(),
                        id: target_id,
                    })?;
                related.push(target);
            }

            tracing::debug!(
                pivot = pivot.as_str(),
                source_id = source_id.get(),
                row_count = related.len() as u64,
                "relation resolved"
            );
            Ok(related)
        })
    }

    /// Create and save the join row for `left` and `right`
    ///
    /// # Errors
    /// * `Referential` - either record is unsaved or no longer stored
    /// * `Storage` - the join table is missing
    pub fn attach<L: Model, R: Model>(&mut self, left: &L, right: &R) -> Result<Pivot<L, R>> {
        let mut pivot = Pivot::new(left, right);
        self.save(&mut pivot)?;
        Ok(pivot)
    }

    /// Remove every join row between `left` and `right`; returns rows removed
    ///
    /// # Errors
    /// * `Referential` - either record is unsaved
    /// * `Storage` - the driver failed
    pub fn detach<L: Model, R: Model>(&mut self, left: &L, right: &R) -> Result<usize> {
        let pivot = Pivot::<L, R>::entity();
        observe("detach", &pivot, || {
            let filter = Self::pair_filter(left, right)?;
            self.driver.delete(&pivot, &filter)
        })
    }

    /// Whether at least one join row links `left` and `right`
    ///
    /// Unsaved records are never attached.
    ///
    /// # Errors
    /// * `Storage` - the join table is missing
    pub fn is_attached<L: Model, R: Model>(&self, left: &L, right: &R) -> Result<bool> {
        if left.id().is_none() || right.id().is_none() {
            return Ok(false);
        }
        let pivot = Pivot::<L, R>::entity();
        let filter = Self::pair_filter(left, right)?;
        Ok(!self.driver.select(&pivot, &filter)?.is_empty())
    }

    fn pair_filter<L: Model, R: Model>(left: &L, right: &R) -> Result<Filter> {
        let left_id = left.id().ok_or_else(|| RelixError::UnpersistedSource {
            entity: L::entity(),
        })?;
        let right_id = right.id().ok_or_else(|| RelixError::UnpersistedSource {
            entity: R::entity(),
        })?;
        Ok(Filter::eq(L::foreign_key_column(), left_id).and(R::foreign_key_column(), right_id))
    }
}
