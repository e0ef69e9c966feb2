//! CLI configuration
//!
//! Loaded from a `.env` file when present, then from the process
//! environment. Command line flags override both.
//!
//! | Variable               | Meaning                                   |
//! |------------------------|-------------------------------------------|
//! | `BRIDGE_SETTINGS_PATH` | Bridging settings JSON used by `validate` |
//! | `BRIDGE_LOG`           | Log filter, e.g. `debug` or `info,apex_bridge_rs=debug` |

use eyre::{eyre, Result, WrapErr};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use apex_bridge_rs::BridgingSettings;

pub const SETTINGS_PATH_VAR: &str = "BRIDGE_SETTINGS_PATH";
pub const LOG_FILTER_VAR: &str = "BRIDGE_LOG";

/// Main configuration for the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the bridging settings JSON
    pub settings_path: Option<PathBuf>,
    /// Log filter directive; `RUST_LOG` is used when unset
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration, reading `.env` first if present
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env")
    }

    /// Load from a specific .env file path, then the environment
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Build from a variable lookup; blank values count as unset
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Config {
            settings_path: non_blank(SETTINGS_PATH_VAR).map(PathBuf::from),
            log_filter: non_blank(LOG_FILTER_VAR),
        }
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, settings_path: Option<PathBuf>, log_filter: Option<String>) -> Self {
        if settings_path.is_some() {
            self.settings_path = settings_path;
        }
        if log_filter.is_some() {
            self.log_filter = log_filter;
        }
        self
    }

    /// Load the bridging settings this configuration points at
    pub fn load_settings(&self) -> Result<BridgingSettings> {
        let path = self.settings_path.as_deref().ok_or_else(|| {
            eyre!(
                "No bridging settings configured: pass --settings or set {}",
                SETTINGS_PATH_VAR
            )
        })?;
        load_settings_file(path)
    }
}

/// Read and check a bridging settings JSON file
pub fn load_settings_file(path: &Path) -> Result<BridgingSettings> {
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = BridgingSettings::from_json(&json)
        .wrap_err_with(|| format!("Invalid settings file {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        mainnet = settings.mainnet,
        chains = settings.chains.len(),
        directions = settings.directions.len(),
        "Bridging settings loaded"
    );
    Ok(settings)
}
