use relix_core::model::{Column, Model, RecordMeta, Row};
use relix_core::{Database, Pivot, Result};
use relix_store::SqliteDriver;

#[derive(Debug, Clone)]
pub struct Author {
    meta: RecordMeta,
    pub name: String,
}

impl Author {
    #[allow(dead_code)]
    pub fn new(name: &str) -> Self {
        Self {
            meta: RecordMeta::new(),
            name: name.to_string(),
        }
    }
}

impl Model for Author {
    fn name() -> String {
        "author".to_string()
    }

    fn columns() -> Vec<Column> {
        vec![Column::text("name")]
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn to_row(&self) -> Row {
        Row::for_table(Self::entity()).with("name", self.name.as_str())
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            meta: RecordMeta::loaded(row.id()?),
            name: row.text("name")?,
        })
    }
}

/// `subtitle` is nullable to cover NULL round trips
#[derive(Debug, Clone)]
pub struct Book {
    meta: RecordMeta,
    pub title: String,
    pub subtitle: Option<String>,
    pub price: f64,
}

impl Book {
    #[allow(dead_code)]
    pub fn new(title: &str, price: f64) -> Self {
        Self {
            meta: RecordMeta::new(),
            title: title.to_string(),
            subtitle: None,
            price,
        }
    }
}

impl Model for Book {
    fn name() -> String {
        "book".to_string()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::text("title"),
            Column::text("subtitle").nullable(),
            Column::real("price"),
        ]
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn to_row(&self) -> Row {
        Row::for_table(Self::entity())
            .with("title", self.title.as_str())
            .with("subtitle", self.subtitle.clone())
            .with("price", self.price)
    }

    fn from_row(row: &Row) -> Result<Self> {
        let subtitle = match row.get("subtitle") {
            Some(relix_core::Value::Text(s)) => Some(s.clone()),
            _ => None,
        };
        Ok(Self {
            meta: RecordMeta::loaded(row.id()?),
            title: row.text("title")?,
            subtitle,
            price: row.real("price")?,
        })
    }
}

pub type Authorship = Pivot<Author, Book>;

#[allow(dead_code)]
pub fn prepare_all(db: &mut Database<SqliteDriver>) {
    db.prepare::<Author>().unwrap();
    db.prepare::<Book>().unwrap();
    db.prepare::<Authorship>().unwrap();
}

/// Fresh in-memory SQLite database with every table prepared
#[allow(dead_code)]
pub fn setup_test_db() -> Database<SqliteDriver> {
    let mut db = Database::new(SqliteDriver::open_in_memory().unwrap());
    prepare_all(&mut db);
    db
}
