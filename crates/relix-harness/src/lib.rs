//! relix harness - named scenarios exercising records and pivot relations
//!
//! - Demo models: `Atom`, `Compound` and their join `AtomCompound`
//! - `Tester`: runs scenarios with setup and teardown around each one
//! - Scenario catalogue covering save/find, relations and schema lifecycle
//! - `Report` with text and JSON rendering
//! - `HarnessConfig` loaded from TOML

pub mod config;
pub mod errors;
pub mod expect;
pub mod models;
pub mod report;
pub mod scenarios;
pub mod tester;

pub use config::HarnessConfig;
pub use errors::HarnessError;
pub use models::{Atom, AtomCompound, Compound};
pub use report::{Report, ScenarioOutcome, ScenarioStatus};
pub use scenarios::{catalogue, chemistry_tester, scenario_names};
pub use tester::{Scenario, Tester};
