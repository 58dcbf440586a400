//! SQL generation
//!
//! Identifiers are validated and double-quoted; values never appear in
//! statement text and are always bound as parameters.

use relix_core::model::table::validate_identifier;
use relix_core::model::{Column, ColumnKind, Row, TableSchema, ID_COLUMN};
use relix_core::{Filter, Identity, Value};
use rusqlite::types::Value as SqlValue;

use crate::errors::Result;
use crate::values::to_sql;

/// Statement text with its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }
}

/// # Errors
/// * `InvalidInput` - `name` is not a plain identifier
pub fn quote(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name))
}

fn column_definition(column: &Column) -> Result<String> {
    let ty = match &column.kind {
        ColumnKind::Text => "TEXT".to_string(),
        ColumnKind::Integer => "INTEGER".to_string(),
        ColumnKind::Real => "REAL".to_string(),
        ColumnKind::Reference(target) => {
            format!("INTEGER REFERENCES {}({})", quote(target)?, quote(ID_COLUMN)?)
        }
    };
    let null = if column.nullable { "" } else { " NOT NULL" };
    Ok(format!("{} {}{}", quote(&column.name)?, ty, null))
}

/// `CREATE TABLE IF NOT EXISTS` with an autoincrementing identity
///
/// AUTOINCREMENT keeps identities from being reused after deletes.
///
/// # Errors
/// * `InvalidInput` - a table or column name is not a plain identifier
pub fn create_table(schema: &TableSchema) -> Result<String> {
    let mut definitions = vec![format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        quote(ID_COLUMN)?
    )];
    for column in schema.columns() {
        definitions.push(column_definition(column)?);
    }
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote(schema.name())?,
        definitions.join(", ")
    ))
}

/// # Errors
/// * `InvalidInput` - `table` is not a plain identifier
pub fn drop_table(table: &str) -> Result<String> {
    Ok(format!("DROP TABLE IF EXISTS {}", quote(table)?))
}

/// Append `WHERE ...` for `filter`; `Null` compares with `IS NULL`
fn push_where(stmt: &mut Statement, filter: &Filter) -> Result<()> {
    if filter.is_empty() {
        return Ok(());
    }
    let mut clauses = Vec::with_capacity(filter.conditions().len());
    for (column, value) in filter.conditions() {
        if matches!(value, Value::Null) {
            clauses.push(format!("{} IS NULL", quote(column)?));
        } else {
            stmt.params.push(to_sql(value));
            clauses.push(format!("{} = ?{}", quote(column)?, stmt.params.len()));
        }
    }
    stmt.sql.push_str(" WHERE ");
    stmt.sql.push_str(&clauses.join(" AND "));
    Ok(())
}

/// # Errors
/// * `InvalidInput` - a table or column name is not a plain identifier
pub fn insert(table: &str, row: &Row) -> Result<Statement> {
    let row = row.without_id();
    if row.is_empty() {
        return Ok(Statement::new(format!(
            "INSERT INTO {} DEFAULT VALUES",
            quote(table)?
        )));
    }

    let mut columns = Vec::with_capacity(row.len());
    let mut placeholders = Vec::with_capacity(row.len());
    let mut stmt = Statement::new(String::new());
    for (i, (column, value)) in row.iter().enumerate() {
        columns.push(quote(column)?);
        placeholders.push(format!("?{}", i + 1));
        stmt.params.push(to_sql(value));
    }
    stmt.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table)?,
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(stmt)
}

/// `None` when `row` carries nothing to write
///
/// # Errors
/// * `InvalidInput` - a table or column name is not a plain identifier
pub fn update(table: &str, id: Identity, row: &Row) -> Result<Option<Statement>> {
    let row = row.without_id();
    if row.is_empty() {
        return Ok(None);
    }

    let mut stmt = Statement::new(String::new());
    let mut assignments = Vec::with_capacity(row.len());
    for (column, value) in row.iter() {
        stmt.params.push(to_sql(value));
        assignments.push(format!("{} = ?{}", quote(column)?, stmt.params.len()));
    }
    stmt.params.push(SqlValue::Integer(id.get()));
    stmt.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?{}",
        quote(table)?,
        assignments.join(", "),
        quote(ID_COLUMN)?,
        stmt.params.len()
    );
    Ok(Some(stmt))
}

/// Rows in ascending identity
///
/// # Errors
/// * `InvalidInput` - a table or column name is not a plain identifier
pub fn select(table: &str, filter: &Filter) -> Result<Statement> {
    let mut stmt = Statement::new(format!("SELECT * FROM {}", quote(table)?));
    push_where(&mut stmt, filter)?;
    stmt.sql.push_str(&format!(" ORDER BY {} ASC", quote(ID_COLUMN)?));
    Ok(stmt)
}

/// # Errors
/// * `InvalidInput` - a table or column name is not a plain identifier
pub fn delete(table: &str, filter: &Filter) -> Result<Statement> {
    let mut stmt = Statement::new(format!("DELETE FROM {}", quote(table)?));
    push_where(&mut stmt, filter)?;
    Ok(stmt)
}
