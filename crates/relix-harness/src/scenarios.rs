//! Scenario catalogue
//!
//! Every scenario starts from freshly prepared atom, compound and join
//! tables and reverts them afterwards (see [`chemistry_tester`]).

use relix_core::errors::{ExErrorKind, Result};
use relix_core::{Database, Driver, Model};

use crate::config::HarnessConfig;
use crate::errors::HarnessError;
use crate::expect::{ensure, ensure_eq, expect_failure};
use crate::models::{Atom, AtomCompound, Compound};
use crate::tester::{Scenario, Tester};

pub const INSERT_AND_FIND: &str = "insert_and_find";
pub const UPDATE_IN_PLACE: &str = "update_in_place";
pub const PIVOT_RELATIONS: &str = "pivot_relations";
pub const UNPERSISTED_PIVOT_REJECTED: &str = "unpersisted_pivot_rejected";
pub const RAW_QUERY: &str = "raw_query";
pub const TEARDOWN_IDEMPOTENCE: &str = "teardown_idempotence";

/// Catalogue order
pub fn scenario_names() -> Vec<&'static str> {
    vec![
        INSERT_AND_FIND,
        UPDATE_IN_PLACE,
        PIVOT_RELATIONS,
        UNPERSISTED_PIVOT_REJECTED,
        RAW_QUERY,
        TEARDOWN_IDEMPOTENCE,
    ]
}

pub fn catalogue<D: Driver + 'static>(config: &HarnessConfig) -> Vec<Scenario<D>> {
    let statement = config.raw_statement.clone();
    vec![
        Scenario::new(INSERT_AND_FIND, insert_and_find),
        Scenario::new(UPDATE_IN_PLACE, update_in_place),
        Scenario::new(PIVOT_RELATIONS, pivot_relations),
        Scenario::new(UNPERSISTED_PIVOT_REJECTED, unpersisted_pivot_rejected),
        Scenario::new(RAW_QUERY, move |db| raw_query(db, &statement)),
        Scenario::new(TEARDOWN_IDEMPOTENCE, teardown_idempotence),
    ]
}

/// Tester with the chemistry tables managed around each scenario and the
/// catalogue narrowed to `config.scenarios`
///
/// # Errors
/// * `InvalidInput` - `config.scenarios` names an unknown scenario
pub fn chemistry_tester<D: Driver + 'static>(
    db: Database<D>,
    config: &HarnessConfig,
) -> Result<Tester<D>> {
    let mut tester = Tester::new(db)
        .with_setup(prepare_chemistry)
        .with_teardown(revert_chemistry);
    for scenario in catalogue(config) {
        tester.add(scenario);
    }
    if let Some(names) = &config.scenarios {
        tester.retain(names)?;
    }
    Ok(tester)
}

/// # Errors
/// * `SchemaDrift` - a table exists with another definition
/// * `Storage` - the driver failed
pub fn prepare_chemistry<D: Driver>(db: &mut Database<D>) -> Result<()> {
    db.prepare::<Atom>()?;
    db.prepare::<Compound>()?;
    db.prepare::<AtomCompound>()
}

/// Join table first so no foreign key outlives its target
///
/// # Errors
/// * `Storage` - the driver failed
pub fn revert_chemistry<D: Driver>(db: &mut Database<D>) -> Result<()> {
    db.revert::<AtomCompound>()?;
    db.revert::<Compound>()?;
    db.revert::<Atom>()
}

fn names<M>(records: &[M], name: impl Fn(&M) -> &str) -> Vec<String> {
    records.iter().map(|r| name(r).to_string()).collect()
}

fn insert_and_find<D: Driver>(db: &mut Database<D>) -> Result<()> {
    let mut hydrogen = Atom::new("Hydrogen", 1, 1.007);
    ensure(!hydrogen.exists() && hydrogen.id().is_none(), || {
        "new atom already has storage state".to_string()
    })?;

    let id = db.save(&mut hydrogen)?;
    ensure(hydrogen.exists(), || "atom not marked as existing after save".to_string())?;
    ensure_eq("identity after save", hydrogen.id(), Some(id))?;

    let found: Atom = db.find(id)?.ok_or_else(|| HarnessError::Expectation {
        detail: format!("atom {} not found after save", id),
    })?;
    ensure_eq("found atom", &found, &hydrogen)
}

fn update_in_place<D: Driver>(db: &mut Database<D>) -> Result<()> {
    let mut carbon = Atom::new("Carbon", 6, 12.011);
    let first = db.save(&mut carbon)?;

    carbon.weight = 12.0;
    let second = db.save(&mut carbon)?;
    ensure_eq("identity after second save", second, first)?;
    ensure_eq("atom count", db.count::<Atom>()?, 1)?;

    let found: Option<Atom> = db.find(first)?;
    ensure_eq("stored weight", found.map(|a| a.weight), Some(12.0))
}

fn pivot_relations<D: Driver>(db: &mut Database<D>) -> Result<()> {
    let mut atoms = [
        Atom::new("Hydrogen", 1, 1.007),
        Atom::new("Carbon", 6, 12.011),
        Atom::new("Oxygen", 8, 15.999),
    ];
    for atom in atoms.iter_mut() {
        db.save(atom)?;
    }
    let mut compounds = [Compound::new("Water"), Compound::new("Sugar")];
    for compound in compounds.iter_mut() {
        db.save(compound)?;
    }

    let [hydrogen, carbon, oxygen] = &atoms;
    let [water, sugar] = &compounds;
    let links = [
        (hydrogen, water),
        (oxygen, water),
        (hydrogen, sugar),
        (oxygen, sugar),
        (carbon, sugar),
    ];
    for (atom, compound) in links {
        let mut link = AtomCompound::new(atom, compound);
        db.save(&mut link)?;
    }

    ensure_eq(
        "Hydrogen compounds",
        names(&hydrogen.compounds(db)?, |c| c.name.as_str()),
        vec!["Water".to_string(), "Sugar".to_string()],
    )?;
    ensure_eq(
        "Carbon compounds",
        names(&carbon.compounds(db)?, |c| c.name.as_str()),
        vec!["Sugar".to_string()],
    )?;

    let in_sugar = sugar.atoms(db)?;
    ensure_eq("Sugar atom count", in_sugar.len(), 3)?;
    ensure_eq(
        "Sugar atoms",
        names(&in_sugar, |a| a.name.as_str()),
        vec![
            "Hydrogen".to_string(),
            "Oxygen".to_string(),
            "Carbon".to_string(),
        ],
    )?;

    // every link is visible from both sides
    for (atom, compound) in links {
        ensure(atom.compounds(db)?.contains(compound), || {
            format!("{} does not list {}", atom.name, compound.name)
        })?;
        ensure(compound.atoms(db)?.contains(atom), || {
            format!("{} does not list {}", compound.name, atom.name)
        })?;
    }

    ensure_eq("join rows", db.count::<AtomCompound>()?, links.len())
}

fn unpersisted_pivot_rejected<D: Driver>(db: &mut Database<D>) -> Result<()> {
    let mut hydrogen = Atom::new("Hydrogen", 1, 1.007);
    db.save(&mut hydrogen)?;
    let water = Compound::new("Water");

    let mut link = AtomCompound::new(&hydrogen, &water);
    expect_failure(
        "saving a link to an unsaved compound",
        db.save(&mut link),
        ExErrorKind::Referential,
    )?;
    ensure(!link.exists(), || "rejected link marked as existing".to_string())?;
    ensure_eq("join rows", db.count::<AtomCompound>()?, 0)?;

    expect_failure(
        "relations of an unsaved compound",
        water.atoms(db),
        ExErrorKind::Referential,
    )?;
    Ok(())
}

fn raw_query<D: Driver>(db: &mut Database<D>, statement: &str) -> Result<()> {
    let set = db.raw(statement)?;
    tracing::debug!(
        statement,
        row_count = set.len() as u64,
        first = ?set.scalar(),
        "raw statement ran"
    );
    Ok(())
}

fn teardown_idempotence<D: Driver>(db: &mut Database<D>) -> Result<()> {
    revert_chemistry(db)?;
    revert_chemistry(db)?;
    ensure(!db.is_prepared::<Atom>()?, || {
        "atoms still prepared after revert".to_string()
    })?;

    prepare_chemistry(db)?;
    let mut oxygen = Atom::new("Oxygen", 8, 15.999);
    db.save(&mut oxygen)?;
    ensure_eq("atom count after re-prepare", db.count::<Atom>()?, 1)
}
