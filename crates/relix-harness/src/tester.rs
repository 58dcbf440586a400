//! Scenario runner
//!
//! Each scenario runs as setup, body, teardown against the tester's
//! database. Teardown always runs. A failure ends only its own scenario;
//! the run continues with the next one.

use std::time::Instant;

use relix_core::errors::Result;
use relix_core::{log_op_end, log_op_error, log_op_start, Database, Driver};
use relix_core_types::RunId;

use crate::errors::HarnessError;
use crate::report::{Report, ScenarioOutcome, ScenarioStatus};

type Step<D> = Box<dyn Fn(&mut Database<D>) -> Result<()>>;

/// A named body run against the database
pub struct Scenario<D: Driver> {
    name: &'static str,
    body: Step<D>,
}

impl<D: Driver> Scenario<D> {
    pub fn new<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&mut Database<D>) -> Result<()> + 'static,
    {
        Self {
            name,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

pub struct Tester<D: Driver> {
    db: Database<D>,
    run_id: RunId,
    setup: Option<Step<D>>,
    teardown: Option<Step<D>>,
    scenarios: Vec<Scenario<D>>,
}

impl<D: Driver> Tester<D> {
    pub fn new(db: Database<D>) -> Self {
        Self {
            db,
            run_id: RunId::new(),
            setup: None,
            teardown: None,
            scenarios: Vec::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut Database<D>) -> Result<()> + 'static,
    {
        self.setup = Some(Box::new(setup));
        self
    }

    pub fn with_teardown<F>(mut self, teardown: F) -> Self
    where
        F: Fn(&mut Database<D>) -> Result<()> + 'static,
    {
        self.teardown = Some(Box::new(teardown));
        self
    }

    pub fn add(&mut self, scenario: Scenario<D>) {
        self.scenarios.push(scenario);
    }

    pub fn scenario_names(&self) -> Vec<&'static str> {
        self.scenarios.iter().map(Scenario::name).collect()
    }

    /// Keep only the named scenarios, preserving registration order
    ///
    /// # Errors
    /// * `InvalidInput` - a name matches no registered scenario
    pub fn retain(&mut self, names: &[String]) -> Result<()> {
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.scenarios.iter().any(|s| s.name == n.as_str()))
        {
            return Err(HarnessError::UnknownScenario {
                name: unknown.clone(),
            }
            .into());
        }
        self.scenarios
            .retain(|s| names.iter().any(|n| n.as_str() == s.name));
        Ok(())
    }

    pub fn database(&self) -> &Database<D> {
        &self.db
    }

    pub fn into_database(self) -> Database<D> {
        self.db
    }

    /// Run every scenario in registration order
    pub fn run(&mut self) -> Report {
        let mut report = Report::new(self.run_id.clone(), self.db.driver().name());
        for scenario in &self.scenarios {
            let outcome = run_one(
                &mut self.db,
                &self.run_id,
                &self.setup,
                &self.teardown,
                scenario,
            );
            report.outcomes.push(outcome);
        }
        tracing::info!(
            run_id = %self.run_id,
            passed = report.passed() as u64,
            failed = report.failed() as u64,
            "run complete"
        );
        report
    }
}

fn run_one<D: Driver>(
    db: &mut Database<D>,
    run_id: &RunId,
    setup: &Option<Step<D>>,
    teardown: &Option<Step<D>>,
    scenario: &Scenario<D>,
) -> ScenarioOutcome {
    let op = "scenario";
    log_op_start!(op, scenario = scenario.name, run_id = %run_id);
    let start = Instant::now();

    let result = setup
        .as_ref()
        .map_or(Ok(()), |f| f(db))
        .and_then(|()| (scenario.body)(db));
    let cleanup = teardown.as_ref().map_or(Ok(()), |f| f(db));

    let result = match (result, cleanup) {
        (Err(err), Err(cleanup_err)) => {
            tracing::warn!(
                scenario = scenario.name,
                error = %cleanup_err,
                "teardown failed after scenario failure"
            );
            Err(err)
        }
        (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
        (Ok(()), Ok(())) => Ok(()),
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = match &result {
        Ok(()) => {
            log_op_end!(op, duration_ms = duration_ms, scenario = scenario.name);
            ScenarioStatus::Passed
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, scenario = scenario.name);
            ScenarioStatus::failed(err)
        }
    };

    ScenarioOutcome {
        name: scenario.name.to_string(),
        status,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relix_core::{ExError, ExErrorKind, MemoryDriver};
    use std::cell::Cell;
    use std::rc::Rc;

    fn tester() -> Tester<MemoryDriver> {
        Tester::new(Database::new(MemoryDriver::new()))
    }

    #[test]
    fn test_failure_does_not_stop_run() {
        let mut t = tester();
        t.add(Scenario::new("boom", |_| {
            Err(ExError::new(ExErrorKind::Storage).with_message("boom"))
        }));
        t.add(Scenario::new("fine", |_| Ok(())));

        let report = t.run();
        assert_eq!(report.outcomes.len(), 2);
        assert!(!report.outcomes[0].status.is_passed());
        assert!(report.outcomes[1].status.is_passed());
    }

    #[test]
    fn test_teardown_runs_after_failure() {
        let teardowns = Rc::new(Cell::new(0));
        let counter = teardowns.clone();
        let mut t = tester().with_teardown(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        t.add(Scenario::new("boom", |_| {
            Err(ExError::new(ExErrorKind::Internal))
        }));
        t.add(Scenario::new("fine", |_| Ok(())));

        t.run();
        assert_eq!(teardowns.get(), 2);
    }

    #[test]
    fn test_teardown_failure_fails_passing_scenario() {
        let mut t = tester().with_teardown(|_| Err(ExError::new(ExErrorKind::Storage)));
        t.add(Scenario::new("fine", |_| Ok(())));

        let report = t.run();
        match &report.outcomes[0].status {
            ScenarioStatus::Failed { code, .. } => assert_eq!(code, "ERR_STORAGE"),
            ScenarioStatus::Passed => panic!("teardown failure must fail the scenario"),
        }
    }

    #[test]
    fn test_setup_failure_skips_body() {
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let mut t = tester().with_setup(|_| Err(ExError::new(ExErrorKind::Storage)));
        t.add(Scenario::new("body", move |_| {
            flag.set(true);
            Ok(())
        }));

        let report = t.run();
        assert!(!ran.get());
        assert!(!report.is_success());
    }

    #[test]
    fn test_retain_rejects_unknown_names() {
        let mut t = tester();
        t.add(Scenario::new("a", |_| Ok(())));
        t.add(Scenario::new("b", |_| Ok(())));

        let err = t.retain(&["c".to_string()]).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);

        t.retain(&["b".to_string()]).unwrap();
        assert_eq!(t.scenario_names(), vec!["b"]);
    }
}
