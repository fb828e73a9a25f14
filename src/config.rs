use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::aggregate::DateRange;
use crate::store::RecoveryPolicy;

pub(crate) const TABLE_FILE_NAME: &str = "financial_data.csv";
pub(crate) const LOG_FILE_NAME: &str = "tally.log";

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) table_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) recovery: RecoveryPolicy,
    pub(crate) default_range: DateRange,
}

impl Config {
    /// Resolution order for the table path:
    /// 1. `TALLY_DATA_FILE`
    /// 2. `<platform data dir>/financial_data.csv`
    ///
    /// `TALLY_RECOVERY` selects the corruption policy and `TALLY_ANALYZE_RANGE`
    /// the default Analyze window.
    pub(crate) fn load() -> Result<Self> {
        let table_path = match std::env::var_os("TALLY_DATA_FILE") {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => default_data_dir()?.join(TABLE_FILE_NAME),
        };

        let recovery = match std::env::var("TALLY_RECOVERY") {
            Ok(v) => parse_recovery(&v)?,
            Err(_) => RecoveryPolicy::default(),
        };

        let default_range = match std::env::var("TALLY_ANALYZE_RANGE") {
            Ok(v) => DateRange::parse(&v).context("Invalid TALLY_ANALYZE_RANGE")?,
            Err(_) => DateRange::default(),
        };

        Ok(Self::with_table(table_path, recovery, default_range))
    }

    /// Build a config around an explicit table path. The log file sits next to it.
    pub(crate) fn with_table(
        table_path: PathBuf,
        recovery: RecoveryPolicy,
        default_range: DateRange,
    ) -> Self {
        let log_path = table_path
            .parent()
            .map(|dir| dir.join(LOG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME));
        Self {
            table_path,
            log_path,
            recovery,
            default_range,
        }
    }
}

pub(crate) fn parse_recovery(s: &str) -> Result<RecoveryPolicy> {
    match s.trim().to_lowercase().as_str() {
        "" | "reset" => Ok(RecoveryPolicy::Reset),
        "quarantine" => Ok(RecoveryPolicy::Quarantine),
        other => anyhow::bail!("Unknown TALLY_RECOVERY value '{other}' (expected reset or quarantine)"),
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "tally", "Tally")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
