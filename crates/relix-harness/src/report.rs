//! Scenario outcomes and their rendering

use std::fmt::Write as _;

use relix_core::errors::{ExError, Result};
use relix_core_types::RunId;
use serde::Serialize;

use crate::errors::HarnessError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Failed { code: String, error: String },
}

impl ScenarioStatus {
    pub fn failed(err: &ExError) -> Self {
        Self::Failed {
            code: err.code().to_string(),
            error: err.to_string(),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub status: ScenarioStatus,
    pub duration_ms: u64,
}

/// Outcome of every scenario in one run, in run order
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub run_id: RunId,
    pub driver: String,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl Report {
    pub fn new(run_id: RunId, driver: impl Into<String>) -> Self {
        Self {
            run_id,
            driver: driver.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcome(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// Passing scenarios print nothing; each failure gets one line
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            if let ScenarioStatus::Failed { error, .. } = &outcome.status {
                let _ = writeln!(out, "FAIL {}: {}", outcome.name, error);
            }
        }
        let _ = writeln!(
            out,
            "{} passed, {} failed ({} driver, run {})",
            self.passed(),
            self.failed(),
            self.driver,
            self.run_id
        );
        out
    }

    /// # Errors
    /// * `Serialization` - the report cannot be encoded
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            HarnessError::ReportEncoding {
                message: e.to_string(),
            }
            .into()
        })
    }
}
