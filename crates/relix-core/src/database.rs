//! Database context: owns a driver and runs record operations through it
//!
//! There is no global connection; every operation is a method on the
//! `Database` that owns the driver it uses.
//!
//! Logging follows the operation-boundary convention:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

use std::time::Instant;

use crate::driver::{Driver, Filter};
use crate::errors::{RelixError, Result};
use crate::model::{Identity, Model, RowSet, ID_COLUMN};
use crate::{log_op_end, log_op_error, log_op_start};

/// Record store bound to one driver
pub struct Database<D: Driver> {
    pub(crate) driver: D,
}

/// Wrap `f` in start/end/error events for `op` on `entity`
pub(crate) fn observe<T>(op: &'static str, entity: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    log_op_start!(op, entity = entity);
    let start = Instant::now();

    match f() {
        Ok(value) => {
            log_op_end!(
                op,
                duration_ms = start.elapsed().as_millis() as u64,
                entity = entity
            );
            Ok(value)
        }
        Err(err) => {
            let err = err.or_op(op);
            log_op_error!(
                op,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity = entity
            );
            Err(err)
        }
    }
}

impl<D: Driver> Database<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Insert a new record or update a saved one
    ///
    /// On first save the driver assigns the identity and the record is
    /// marked as existing. Foreign keys must point at saved rows.
    ///
    /// # Errors
    /// * `Referential` - a foreign key is unset or dangling
    /// * `NotFound` - the record has an identity but its row is gone
    /// * `Storage` - the driver rejected the write (e.g. table missing)
    pub fn save<M: Model>(&mut self, record: &mut M) -> Result<Identity> {
        let entity = M::entity();
        observe("save", &entity, || self.save_impl(&entity, record))
    }

    fn save_impl<M: Model>(&mut self, entity: &str, record: &mut M) -> Result<Identity> {
        self.check_references(entity, record)?;
        let row = record.to_row();

        let id = match record.id() {
            None => {
                let id = self.driver.insert(entity, &row)?;
                record.meta_mut().assign(entity, id)?;
                id
            }
            Some(id) => {
                if self.driver.update(entity, id, &row)? == 0 {
                    return Err(RelixError::RowVanished {
                        entity: entity.to_string(),
                        id,
                    }
                    .into());
                }
                id
            }
        };

        record.meta_mut().mark_exists(true);
        tracing::debug!(entity, record_id = id.get(), "record saved");
        Ok(id)
    }

    fn check_references<M: Model>(&self, entity: &str, record: &M) -> Result<()> {
        for fk in record.foreign_keys() {
            let id = fk.id.ok_or_else(|| RelixError::UnpersistedReference {
                entity: entity.to_string(),
                column: fk.column.clone(),
            })?;
            if self
                .driver
                .select(&fk.target, &Filter::eq(ID_COLUMN, id))?
                .is_empty()
            {
                return Err(RelixError::DanglingReference {
                    entity: entity.to_string(),
                    column: fk.column,
                    target: fk.target,
                    id,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Look a record up by identity; `None` when absent
    ///
    /// # Errors
    /// * `Storage` - the driver failed
    /// * `Serialization` - the stored row does not decode
    pub fn find<M: Model>(&self, id: Identity) -> Result<Option<M>> {
        let entity = M::entity();
        observe("find", &entity, || self.find_impl(&entity, id))
    }

    pub(crate) fn find_impl<M: Model>(&self, entity: &str, id: Identity) -> Result<Option<M>> {
        self.driver
            .select(entity, &Filter::eq(ID_COLUMN, id))?
            .first()
            .map(M::from_row)
            .transpose()
    }

    /// Every record of the type, ascending identity
    ///
    /// # Errors
    /// * `Storage` - the driver failed
    /// * `Serialization` - a stored row does not decode
    pub fn all<M: Model>(&self) -> Result<Vec<M>> {
        self.query(&Filter::all())
    }

    /// Records matching `filter`, ascending identity
    ///
    /// # Errors
    /// * `Storage` - the driver failed or the filter names an unknown column
    /// * `Serialization` - a stored row does not decode
    pub fn query<M: Model>(&self, filter: &Filter) -> Result<Vec<M>> {
        let entity = M::entity();
        observe("query", &entity, || {
            self.driver
                .select(&entity, filter)?
                .iter()
                .map(M::from_row)
                .collect()
        })
    }

    /// # Errors
    /// * `Storage` - the table is missing or the driver failed
    pub fn count<M: Model>(&self) -> Result<usize> {
        let entity = M::entity();
        observe("count", &entity, || {
            Ok(self.driver.select(&entity, &Filter::all())?.len())
        })
    }

    /// Remove a saved record's row
    ///
    /// The record keeps its identity but no longer exists.
    ///
    /// # Errors
    /// * `InvalidInput` - the record was never saved
    /// * `NotFound` - no row with the record's identity
    pub fn delete<M: Model>(&mut self, record: &mut M) -> Result<()> {
        let entity = M::entity();
        observe("delete", &entity, || {
            let id = record.id().ok_or_else(|| RelixError::NotPersisted {
                entity: entity.clone(),
            })?;
            if self.driver.delete(&entity, &Filter::eq(ID_COLUMN, id))? == 0 {
                return Err(RelixError::RowVanished {
                    entity: entity.clone(),
                    id,
                }
                .into());
            }
            record.meta_mut().mark_exists(false);
            Ok(())
        })
    }

    /// Pass a statement straight to the driver
    ///
    /// # Errors
    /// * `Storage` - a statement failed
    /// * `InvalidInput` - the statement holds no SQL
    /// * `NotImplemented` - the driver has no raw dialect
    pub fn raw(&mut self, statement: &str) -> Result<RowSet> {
        let driver = self.driver.name();
        observe("raw", driver, || self.driver.execute_raw(statement))
    }
}
