//! SQLite driver
//!
//! Implements the relix `Driver` trait over one rusqlite connection. Foreign
//! keys declared by reference columns are enforced by SQLite itself.

use std::path::Path;

use relix_core::model::{RowSet, TableSchema};
use relix_core::{Driver, ExError, ExErrorKind, Filter, Identity, Row};
use rusqlite::{params_from_iter, Batch, Connection, Params};

use crate::db;
use crate::ddl::{self, Statement};
use crate::errors::{from_rusqlite, Result};
use crate::values::from_sql;

/// Driver owning a configured SQLite connection
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Open a database file, creating it if absent
    ///
    /// # Errors
    /// * `Storage` - the file cannot be opened or configured
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            conn: db::open(path)?,
        })
    }

    /// # Errors
    /// * `Storage` - the connection cannot be configured
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
        })
    }

    /// Wrap an existing connection, applying the relix pragmas
    ///
    /// # Errors
    /// * `Storage` - a pragma failed
    pub fn from_connection(conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn execute(&self, op: &str, stmt: &Statement) -> Result<usize> {
        tracing::trace!(sql = stmt.sql.as_str(), "execute");
        self.conn
            .execute(&stmt.sql, params_from_iter(stmt.params.iter()))
            .map_err(|e| from_rusqlite(op, e))
    }

    /// Run a query and decode every row, tagging rows with `table`
    fn query(&self, op: &str, table: Option<&str>, stmt: &Statement) -> Result<RowSet> {
        tracing::trace!(sql = stmt.sql.as_str(), "query");
        let mut prepared = self
            .conn
            .prepare(&stmt.sql)
            .map_err(|e| from_rusqlite(op, e))?;
        decode_rows(
            op,
            table,
            &mut prepared,
            params_from_iter(stmt.params.iter()),
        )
    }
}

fn decode_rows<P: Params>(
    op: &str,
    table: Option<&str>,
    prepared: &mut rusqlite::Statement<'_>,
    params: P,
) -> Result<RowSet> {
    let columns: Vec<String> = prepared
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = prepared.query(params).map_err(|e| from_rusqlite(op, e))?;

    let mut decoded = Vec::new();
    while let Some(row) = rows.next().map_err(|e| from_rusqlite(op, e))? {
        let mut out = match table {
            Some(t) => Row::for_table(t),
            None => Row::new(),
        };
        for (i, column) in columns.iter().enumerate() {
            let value = row.get_ref(i).map_err(|e| from_rusqlite(op, e))?;
            out.set(column.clone(), from_sql(column, value)?);
        }
        decoded.push(out);
    }

    Ok(RowSet {
        columns,
        rows: decoded,
    })
}

impl Driver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn create_table(&mut self, schema: &TableSchema) -> Result<()> {
        let sql = ddl::create_table(schema)?;
        self.conn
            .execute_batch(&sql)
            .map_err(|e| from_rusqlite("create_table", e))
    }

    fn drop_table(&mut self, table: &str) -> Result<()> {
        let sql = ddl::drop_table(table)?;
        self.conn
            .execute_batch(&sql)
            .map_err(|e| from_rusqlite("drop_table", e))
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .map_err(|e| from_rusqlite("table_exists", e))?;
        Ok(count > 0)
    }

    fn insert(&mut self, table: &str, row: &Row) -> Result<Identity> {
        let stmt = ddl::insert(table, row)?;
        self.execute("insert", &stmt)?;
        Ok(Identity::new(self.conn.last_insert_rowid()))
    }

    fn update(&mut self, table: &str, id: Identity, row: &Row) -> Result<usize> {
        match ddl::update(table, id, row)? {
            Some(stmt) => self.execute("update", &stmt),
            // nothing to write; report whether the row is there
            None => Ok(self.select(table, &Filter::eq("id", id))?.len()),
        }
    }

    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>> {
        let stmt = ddl::select(table, filter)?;
        Ok(self.query("select", Some(table), &stmt)?.rows)
    }

    fn delete(&mut self, table: &str, filter: &Filter) -> Result<usize> {
        let stmt = ddl::delete(table, filter)?;
        self.execute("delete", &stmt)
    }

    /// Every statement in `statement` runs in order; the rows of the last one
    /// are returned. Statements returning no columns yield an empty set.
    fn execute_raw(&mut self, statement: &str) -> Result<RowSet> {
        tracing::trace!(sql = statement, "execute_raw");
        let mut batch = Batch::new(&self.conn, statement);
        let mut last = None;
        while let Some(mut prepared) = batch
            .next()
            .map_err(|e| from_rusqlite("execute_raw", e))?
        {
            let set = decode_rows("execute_raw", None, &mut prepared, rusqlite::params![])?;
            last = Some(set);
        }
        last.ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("execute_raw")
                .with_message("raw statement contains no SQL")
        })
    }
}
