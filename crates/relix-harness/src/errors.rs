//! Harness failures and their mapping onto the core error facility

use relix_core::errors::{ExError, ExErrorKind};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    /// A scenario check did not hold
    #[error("expectation failed: {detail}")]
    Expectation { detail: String },

    #[error("unknown scenario '{name}'")]
    UnknownScenario { name: String },

    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {message}")]
    ConfigParse { message: String },

    #[error("cannot encode report: {message}")]
    ReportEncoding { message: String },
}

impl From<HarnessError> for ExError {
    fn from(err: HarnessError) -> Self {
        let message = err.to_string();
        let kind = match err {
            HarnessError::Expectation { .. } => ExErrorKind::AssertionFailed,
            HarnessError::UnknownScenario { .. } | HarnessError::ConfigParse { .. } => {
                ExErrorKind::InvalidInput
            }
            HarnessError::ConfigRead { .. } => ExErrorKind::Io,
            HarnessError::ReportEncoding { .. } => ExErrorKind::Serialization,
        };
        ExError::new(kind).with_message(message)
    }
}
