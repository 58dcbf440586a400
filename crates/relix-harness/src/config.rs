//! Harness configuration
//!
//! ```toml
//! database = "relix.db"
//! raw_statement = "SELECT sqlite_version()"
//! scenarios = ["insert_and_find", "pivot_relations"]
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use relix_core::Result;
use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;

pub const DEFAULT_RAW_STATEMENT: &str = "SELECT sqlite_version()";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// SQLite file; in-memory when absent
    pub database: Option<PathBuf>,
    /// Statement run by the `raw_query` scenario
    pub raw_statement: String,
    /// Scenario subset in catalogue order; all when absent
    pub scenarios: Option<Vec<String>>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            database: None,
            raw_statement: DEFAULT_RAW_STATEMENT.to_string(),
            scenarios: None,
        }
    }
}

impl HarnessConfig {
    /// # Errors
    /// * `InvalidInput` - the text is not valid harness TOML
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            HarnessError::ConfigParse {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// # Errors
    /// * `Io` - the file cannot be read
    /// * `InvalidInput` - the contents are not valid harness TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relix_core::ExErrorKind;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = HarnessConfig::from_toml_str("").unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.raw_statement, DEFAULT_RAW_STATEMENT);
    }

    #[test]
    fn test_partial_file() {
        let config = HarnessConfig::from_toml_str(
            r#"
            scenarios = ["pivot_relations"]
            "#,
        )
        .unwrap();
        assert_eq!(config.scenarios, Some(vec!["pivot_relations".to_string()]));
        assert_eq!(config.database, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = HarnessConfig::from_toml_str("verbose = true").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = HarnessConfig::load("/nonexistent/relix.toml").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }
}
