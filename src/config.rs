//! Runtime configuration
//!
//! Resolved from command-line flags and environment variables. Flags win.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

// Environment variable names
pub const ENV_DB_PATH: &str = "TOUCHDOWN_DB";
pub const ENV_LOG: &str = "TOUCHDOWN_LOG";
const ENV_RUST_LOG: &str = "RUST_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Load configuration. `db_override` comes from the `--db` flag.
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        Self::resolve(db_override, |key| env::var(key).ok())
    }

    fn resolve(
        db_override: Option<PathBuf>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path,
            None => match var(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
                Some(path) => PathBuf::from(path),
                None => Self::default_db_path()?,
            },
        };

        let log_filter = var(ENV_RUST_LOG)
            .or_else(|| var(ENV_LOG))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            db_path,
            log_filter,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow!("Could not find data directory"))?;
        Ok(data_dir.join("touchdown").join("touchdown.db"))
    }
}
