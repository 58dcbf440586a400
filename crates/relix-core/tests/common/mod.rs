use relix_core::model::{Column, Model, RecordMeta, Row};
use relix_core::{Database, MemoryDriver, Pivot, Result};

#[derive(Debug, Clone)]
pub struct Student {
    meta: RecordMeta,
    pub name: String,
    pub year: i64,
}

impl Student {
    #[allow(dead_code)]
    pub fn new(name: &str, year: i64) -> Self {
        Self {
            meta: RecordMeta::new(),
            name: name.to_string(),
            year,
        }
    }
}

impl Model for Student {
    fn name() -> String {
        "student".to_string()
    }

    fn columns() -> Vec<Column> {
        vec![Column::text("name"), Column::integer("year")]
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn to_row(&self) -> Row {
        Row::for_table(Self::entity())
            .with("name", self.name.as_str())
            .with("year", self.year)
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            meta: RecordMeta::loaded(row.id()?),
            name: row.text("name")?,
            year: row.integer("year")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Course {
    meta: RecordMeta,
    pub title: String,
    pub credits: f64,
}

impl Course {
    #[allow(dead_code)]
    pub fn new(title: &str, credits: f64) -> Self {
        Self {
            meta: RecordMeta::new(),
            title: title.to_string(),
            credits,
        }
    }
}

impl Model for Course {
    fn name() -> String {
        "course".to_string()
    }

    fn columns() -> Vec<Column> {
        vec![Column::text("title"), Column::real("credits")]
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
            .with("credits", self.credits)
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            meta: RecordMeta::loaded(row.id()?),
            title: row.text("title")?,
            credits: row.real("credits")?,
        })
    }
}

pub type Enrollment = Pivot<Student, Course>;

/// Memory-backed database with students, courses and their join table
#[allow(dead_code)]
pub fn prepared_db() -> Database<MemoryDriver> {
    let mut db = Database::new(MemoryDriver::new());
    db.prepare::<Student>().unwrap();
    db.prepare::<Course>().unwrap();
    db.prepare::<Enrollment>().unwrap();
    db
}

#[allow(dead_code)]
pub fn saved_student(db: &mut Database<MemoryDriver>, name: &str) -> Student {
    let mut s = Student::new(name, 1);
    db.save(&mut s).unwrap();
    s
}

#[allow(dead_code)]
pub fn saved_course(db: &mut Database<MemoryDriver>, title: &str) -> Course {
    let mut c = Course::new(title, 5.0);
    db.save(&mut c).unwrap();
    c
}
