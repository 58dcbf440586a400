//! Harness run command
//!
//! Usage: relix run [--database PATH] [--config FILE] [--scenario NAME]...
//!                  [--format text|json] [--log-profile development|production]

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use relix_core::logging_facility::{self, Profile};
use relix_core::{Database, Result};
use relix_harness::{chemistry_tester, HarnessConfig};
use relix_store::SqliteDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogProfile {
    Development,
    Production,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Development => Profile::Development,
            LogProfile::Production => Profile::Production,
        }
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// SQLite database file (in-memory when neither this nor the config sets one)
    #[arg(long, env = "RELIX_DATABASE")]
    pub database: Option<PathBuf>,

    /// TOML harness config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run only this scenario (repeatable)
    #[arg(long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, value_enum, default_value_t = LogProfile::Production)]
    pub log_profile: LogProfile,
}

/// Flags override the config file
fn resolve_config(args: &RunArgs) -> Result<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(database) = &args.database {
        config.database = Some(database.clone());
    }
    if !args.scenarios.is_empty() {
        config.scenarios = Some(args.scenarios.clone());
    }
    Ok(config)
}

/// Returns whether every scenario passed
///
/// # Errors
/// * `Io` - the config file cannot be read
/// * `InvalidInput` - bad config or unknown scenario name
/// * `Storage` - the database cannot be opened
pub fn execute(args: RunArgs) -> Result<bool> {
    logging_facility::init(args.log_profile.into());
    let config = resolve_config(&args)?;

    let driver = match &config.database {
        Some(path) => SqliteDriver::open(path)?,
        None => SqliteDriver::open_in_memory()?,
    };
    let mut tester = chemistry_tester(Database::new(driver), &config)?;
    let report = tester.run();

    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(report.is_success())
}
