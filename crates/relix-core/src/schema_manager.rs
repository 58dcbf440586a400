//! Schema manager: creates and drops the tables behind record types
//!
//! Prepared tables are recorded in a ledger table together with a checksum
//! of their definition. Preparing again with the same definition is a no-op;
//! a changed definition is refused instead of silently recreating storage,
//! and so is a same-named table the ledger has no entry for.

use crate::database::{observe, Database};
use crate::driver::{Driver, Filter};
use crate::errors::{RelixError, Result};
use crate::model::{Column, Model, Row, TableSchema};

/// Ledger of prepared tables
pub const LEDGER_TABLE: &str = "relix_schema";

fn ledger_schema() -> Result<TableSchema> {
    TableSchema::new(
        LEDGER_TABLE,
        vec![
            Column::text("entity"),
            Column::text("checksum"),
            Column::integer("prepared_at"),
        ],
    )
}

impl<D: Driver> Database<D> {
    /// Create storage for `M` if absent
    ///
    /// # Errors
    /// * `InvalidInput` - the model's definition is unusable
    /// * `SchemaDrift` - the table was prepared from a different definition,
    ///   or exists without a ledger entry
    /// * `Storage` - the driver failed
    pub fn prepare<M: Model>(&mut self) -> Result<()> {
        let entity = M::entity();
        observe("prepare", &entity, || {
            M::validate_schema()?;
            let schema = M::schema()?;
            self.prepare_schema(&schema)
        })
    }

    fn prepare_schema(&mut self, schema: &TableSchema) -> Result<()> {
        self.driver.create_table(&ledger_schema()?)?;
        let checksum = schema.checksum();

        match self.recorded_checksum(schema.name())? {
            Some(recorded) if recorded == checksum => {
                // storage dropped outside the ledger is recreated
                if !self.driver.table_exists(schema.name())? {
                    self.driver.create_table(schema)?;
                }
                tracing::debug!(entity = schema.name(), "already prepared");
                Ok(())
            }
            Some(recorded) => Err(RelixError::SchemaDrift {
                entity: schema.name().to_string(),
                recorded,
                current: checksum,
            }
            .into()),
            // a table the ledger never saw may hold any layout
            None if self.driver.table_exists(schema.name())? => {
                Err(RelixError::UnmanagedTable {
                    entity: schema.name().to_string(),
                }
                .into())
            }
            None => {
                self.driver.create_table(schema)?;
                let entry = Row::for_table(LEDGER_TABLE)
                    .with("entity", schema.name())
                    .with("checksum", checksum)
                    .with("prepared_at", chrono::Utc::now().timestamp_millis());
                self.driver.insert(LEDGER_TABLE, &entry)?;
                Ok(())
            }
        }
    }

    fn recorded_checksum(&self, entity: &str) -> Result<Option<String>> {
        self.driver
            .select(LEDGER_TABLE, &Filter::eq("entity", entity))?
            .first()
            .map(|row| row.text("checksum"))
            .transpose()
    }

    /// Drop storage for `M` and forget it in the ledger
    ///
    /// Safe on storage that was never prepared or is already reverted.
    ///
    /// # Errors
    /// * `InvalidInput` - the entity is not a plain identifier
    /// * `Storage` - the driver failed
    pub fn revert<M: Model>(&mut self) -> Result<()> {
        let entity = M::entity();
        observe("revert", &entity, || {
            crate::model::table::validate_identifier(&entity)?;
            self.driver.drop_table(&entity)?;
            if self.driver.table_exists(LEDGER_TABLE)? {
                self.driver
                    .delete(LEDGER_TABLE, &Filter::eq("entity", entity.as_str()))?;
            }
            Ok(())
        })
    }

    /// Whether `M` is recorded in the ledger and its table exists
    ///
    /// # Errors
    /// * `Storage` - the driver failed
    pub fn is_prepared<M: Model>(&self) -> Result<bool> {
        let entity = M::entity();
        if !self.driver.table_exists(LEDGER_TABLE)? {
            return Ok(false);
        }
        Ok(self.recorded_checksum(&entity)?.is_some() && self.driver.table_exists(&entity)?)
    }
}
