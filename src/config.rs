//! Application config (strict YAML).
//!
//! ```yaml
//! display:
//!   locale: en-US
//!   percentage_decimals: 1
//!   truncate_length: 100
//! data:
//!   loans_path: data/loans.json
//!   transactions_path: data/transactions.csv
//! server:
//!   listen: 0.0.0.0:3000
//! ```
//!
//! Every section and field is optional; unknown keys are rejected.

use crate::error::{DisplayError, Result};
use crate::formatters::{DEFAULT_PERCENTAGE_DECIMALS, DEFAULT_TRUNCATE_LENGTH};
use crate::locale::{LocaleProfile, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub data: DataSources,
    pub server: ServerConfig,
}

/// How values are rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DisplayConfig {
    pub locale: String,
    pub percentage_decimals: u32,
    pub truncate_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            percentage_decimals: DEFAULT_PERCENTAGE_DECIMALS,
            truncate_length: DEFAULT_TRUNCATE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DataSources {
    pub loans_path: PathBuf,
    pub transactions_path: PathBuf,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            loans_path: PathBuf::from("data/loans.json"),
            transactions_path: PathBuf::from("data/transactions.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.display.locale.trim().is_empty() {
            return Err(DisplayError::Config("display.locale must not be empty".into()));
        }
        if !LocaleProfile::is_supported(&self.display.locale) {
            tracing::warn!(
                locale = %self.display.locale,
                "display.locale has no dedicated profile, rendering as {}",
                DEFAULT_LOCALE
            );
        }
        if self.display.percentage_decimals > 10 {
            return Err(DisplayError::Config(format!(
                "display.percentage_decimals must be at most 10, got {}",
                self.display.percentage_decimals
            )));
        }
        if self.display.truncate_length == 0 {
            return Err(DisplayError::Config("display.truncate_length must be positive".into()));
        }
        self.server.listen.parse::<SocketAddr>().map_err(|e| {
            DisplayError::Config(format!("server.listen must be a valid socket address: {e}"))
        })?;
        Ok(())
    }
}

pub fn load_from_file(path: &Path) -> Result<AppConfig> {
    let s = fs::read_to_string(path).map_err(|source| DisplayError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    // An empty file is a valid, all-defaults config
    let cfg: AppConfig = if s.trim().is_empty() {
        AppConfig::default()
    } else {
        serde_yaml::from_str(s)?
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Config from `path` if given, otherwise built-in defaults
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(p) => load_from_file(p),
        None => Ok(AppConfig::default()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
