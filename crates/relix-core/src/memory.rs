//! In-memory driver
//!
//! BTreeMap-backed tables for unit tests and dry runs. Single-threaded, no
//! locking. Foreign keys are not enforced here; the record layer checks them
//! before writing. Raw statements are not interpreted.

use std::collections::BTreeMap;

use crate::driver::{Driver, Filter};
use crate::errors::{storage_error, ExError, ExErrorKind, Result};
use crate::model::{Identity, Row, RowSet, TableSchema, Value, ID_COLUMN};

#[derive(Debug, Clone)]
struct MemoryTable {
    schema: TableSchema,
    last_id: i64,
    rows: BTreeMap<i64, Row>,
}

impl MemoryTable {
    fn check_columns(&self, op: &str, row: &Row) -> Result<()> {
        if let Some(unknown) = row.columns().find(|c| !self.schema.has_column(c)) {
            return Err(storage_error(
                op,
                format!("table {} has no column named {}", self.schema.name(), unknown),
            ));
        }
        Ok(())
    }

    fn check_filter(&self, op: &str, filter: &Filter) -> Result<()> {
        if let Some((unknown, _)) = filter
            .conditions()
            .iter()
            .find(|(c, _)| !self.schema.has_column(c))
        {
            return Err(storage_error(
                op,
                format!("table {} has no column named {}", self.schema.name(), unknown),
            ));
        }
        Ok(())
    }

    fn check_not_null(&self, op: &str, row: &Row) -> Result<()> {
        for column in self.schema.columns().iter().filter(|c| !c.nullable) {
            if matches!(row.get(&column.name), None | Some(Value::Null)) {
                return Err(storage_error(
                    op,
                    format!(
                        "NOT NULL constraint failed: {}.{}",
                        self.schema.name(),
                        column.name
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Driver keeping every table in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    tables: BTreeMap<String, MemoryTable>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, op: &str, name: &str) -> Result<&MemoryTable> {
        self.tables
            .get(name)
            .ok_or_else(|| storage_error(op, format!("no such table: {}", name)))
    }

    fn table_mut(&mut self, op: &str, name: &str) -> Result<&mut MemoryTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| storage_error(op, format!("no such table: {}", name)))
    }
}

impl Driver for MemoryDriver {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn create_table(&mut self, schema: &TableSchema) -> Result<()> {
        self.tables
            .entry(schema.name().to_string())
            .or_insert_with(|| MemoryTable {
                schema: schema.clone(),
                last_id: 0,
                rows: BTreeMap::new(),
            });
        Ok(())
    }

    fn drop_table(&mut self, table: &str) -> Result<()> {
        self.tables.remove(table);
        Ok(())
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.tables.contains_key(table))
    }

    fn insert(&mut self, table: &str, row: &Row) -> Result<Identity> {
        let t = self.table_mut("insert", table)?;
        let row = row.without_id();
        t.check_columns("insert", &row)?;
        t.check_not_null("insert", &row)?;

        t.last_id += 1;
        let id = t.last_id;
        let mut stored = Row::for_table(table).with(ID_COLUMN, id);
        for column in t.schema.columns() {
            stored.set(
                column.name.clone(),
                row.get(&column.name).cloned().unwrap_or(Value::Null),
            );
        }
        t.rows.insert(id, stored);
        Ok(Identity::new(id))
    }

    fn update(&mut self, table: &str, id: Identity, row: &Row) -> Result<usize> {
        let t = self.table_mut("update", table)?;
        let row = row.without_id();
        t.check_columns("update", &row)?;

        let mut candidate = match t.rows.get(&id.get()) {
            Some(existing) => existing.clone(),
            None => return Ok(0),
        };
        for (column, value) in row.iter() {
            candidate.set(column, value.clone());
        }
        t.check_not_null("update", &candidate)?;
        t.rows.insert(id.get(), candidate);
        Ok(1)
    }

    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>> {
        let t = self.table("select", table)?;
        t.check_filter("select", filter)?;
        Ok(t.rows
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    fn delete(&mut self, table: &str, filter: &Filter) -> Result<usize> {
        let t = self.table_mut("delete", table)?;
        t.check_filter("delete", filter)?;
        let doomed: Vec<i64> = t
            .rows
            .iter()
            .filter(|(_, row)| filter.matches(row))
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            t.rows.remove(id);
        }
        Ok(doomed.len())
    }

    fn execute_raw(&mut self, _statement: &str) -> Result<RowSet> {
        Err(ExError::new(ExErrorKind::NotImplemented)
            .with_op("execute_raw")
            .with_message("the memory driver does not interpret raw statements"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn driver_with_atoms() -> MemoryDriver {
        let mut driver = MemoryDriver::new();
        let schema = TableSchema::new(
            "atoms",
            vec![Column::text("name"), Column::integer("protons")],
        )
        .unwrap();
        driver.create_table(&schema).unwrap();
        driver
    }

    #[test]
    fn test_insert_assigns_monotonic_ids() {
        let mut driver = driver_with_atoms();
        let a = driver
            .insert("atoms", &Row::new().with("name", "H").with("protons", 1))
            .unwrap();
        let b = driver
            .insert("atoms", &Row::new().with("name", "C").with("protons", 6))
            .unwrap();
        assert_eq!(a, Identity::new(1));
        assert_eq!(b, Identity::new(2));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut driver = driver_with_atoms();
        let row = Row::new().with("name", "H").with("protons", 1);
        driver.insert("atoms", &row).unwrap();
        let second = driver.insert("atoms", &row).unwrap();
        driver
            .delete("atoms", &Filter::eq("id", second))
            .unwrap();

        let third = driver.insert("atoms", &row).unwrap();
        assert_eq!(third, Identity::new(3));
    }

    #[test]
    fn test_insert_into_missing_table_is_storage_error() {
        let mut driver = MemoryDriver::new();
        let err = driver.insert("atoms", &Row::new()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Storage);
        assert!(err.message().contains("no such table"));
    }

    #[test]
    fn test_not_null_enforced() {
        let mut driver = driver_with_atoms();
        let err = driver
            .insert("atoms", &Row::new().with("name", "H"))
            .unwrap_err();
        assert!(err.message().contains("NOT NULL"));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let mut driver = driver_with_atoms();
        let err = driver
            .insert(
                "atoms",
                &Row::new()
                    .with("name", "H")
                    .with("protons", 1)
                    .with("neutrons", 0),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Storage);
    }

    #[test]
    fn test_select_filters_and_orders() {
        let mut driver = driver_with_atoms();
        for (name, protons) in [("O", 8), ("H", 1), ("O", 8)] {
            driver
                .insert("atoms", &Row::new().with("name", name).with("protons", protons))
                .unwrap();
        }
        let oxygen = driver.select("atoms", &Filter::eq("name", "O")).unwrap();
        let ids: Vec<i64> = oxygen.iter().map(|r| r.id().unwrap().get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_unknown_filter_column_rejected_by_select_and_delete() {
        let mut driver = driver_with_atoms();
        driver
            .insert("atoms", &Row::new().with("name", "H").with("protons", 1))
            .unwrap();
        let filter = Filter::eq("neutrons", 0);

        let err = driver.select("atoms", &filter).unwrap_err();
        assert_eq!(err.op(), Some("select"));

        let err = driver.delete("atoms", &filter).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Storage);
        assert_eq!(err.op(), Some("delete"));
        assert!(err.message().contains("no column named neutrons"));
        assert_eq!(driver.select("atoms", &Filter::all()).unwrap().len(), 1);
    }

    #[test]
    fn test_update_missing_row_touches_nothing() {
        let mut driver = driver_with_atoms();
        let n = driver
            .update("atoms", Identity::new(9), &Row::new().with("name", "X"))
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_drop_is_idempotent() {
        let mut driver = driver_with_atoms();
        driver.drop_table("atoms").unwrap();
        driver.drop_table("atoms").unwrap();
        assert!(!driver.table_exists("atoms").unwrap());
    }

    #[test]
    fn test_raw_not_supported() {
        let mut driver = MemoryDriver::new();
        let err = driver.execute_raw("SELECT 1").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotImplemented);
    }
}
