//! Demo records: atoms, compounds and the links between them

use relix_core::model::{Column, Model, RecordMeta, Row};
use relix_core::{Database, Driver, Pivot, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    meta: RecordMeta,
    pub name: String,
    pub protons: i64,
    pub weight: f64,
}

impl Atom {
    pub fn new(name: &str, protons: i64, weight: f64) -> Self {
        Self {
            meta: RecordMeta::new(),
            name: name.to_string(),
            protons,
            weight,
        }
    }

    /// Compounds containing this atom, in link order
    ///
    /// # Errors
    /// * `Referential` - the atom is unsaved
    /// * `Storage` - the driver failed
    pub fn compounds<D: Driver>(&self, db: &Database<D>) -> Result<Vec<Compound>> {
        db.related(self)
    }
}

impl Model for Atom {
    fn name() -> String {
        "atom".to_string()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::text("name"),
            Column::integer("protons"),
            Column::real("weight"),
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
            .with("name", self.name.as_str())
            .with("protons", self.protons)
            .with("weight", self.weight)
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            meta: RecordMeta::loaded(row.id()?),
            name: row.text("name")?,
            protons: row.integer("protons")?,
            weight: row.real("weight")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    meta: RecordMeta,
    pub name: String,
}

impl Compound {
    pub fn new(name: &str) -> Self {
        Self {
            meta: RecordMeta::new(),
            name: name.to_string(),
        }
    }

    /// Atoms in this compound, in link order
    ///
    /// # Errors
    /// * `Referential` - the compound is unsaved
    /// * `Storage` - the driver failed
    pub fn atoms<D: Driver>(&self, db: &Database<D>) -> Result<Vec<Atom>> {
        db.related(self)
    }
}

impl Model for Compound {
    fn name() -> String {
        "compound".to_string()
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

/// Join table `atom_compound`
pub type AtomCompound = Pivot<Atom, Compound>;
