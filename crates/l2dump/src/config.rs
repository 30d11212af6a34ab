//! Configuration file support for l2dump
//!
//! Loads and validates l2dump configuration from TOML files.
//! Default location: /etc/vpp-agent/l2dump.conf

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{warn, Level};

use crate::error::{L2DumpError, Result};

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/vpp-agent/l2dump.conf";

/// An L2 table that can be dumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DumpTable {
    /// Bridge domains and their member interfaces
    BridgeDomains,
    /// L2 FIB entries of every bridge domain
    Fib,
    /// L2 cross-connects
    Xconnect,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

/// Dump configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Tables to dump, in order
    #[serde(default = "default_tables")]
    pub tables: Vec<DumpTable>,

    /// Record dump durations
    #[serde(default = "default_timing")]
    pub timing: bool,

    /// List bridge domain IDs instead of full bridge domain details
    #[serde(default)]
    pub bridge_domain_ids_only: bool,
}

/// Complete l2dump configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2DumpConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub dump: DumpConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tables() -> Vec<DumpTable> {
    vec![DumpTable::BridgeDomains, DumpTable::Fib, DumpTable::Xconnect]
}

fn default_timing() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            tables: default_tables(),
            timing: default_timing(),
            bridge_domain_ids_only: false,
        }
    }
}

impl FromStr for L2DumpConfig {
    type Err = L2DumpError;

    fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| L2DumpError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl L2DumpConfig {
    /// Load configuration from file, `None` if the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => content.parse().map(Some).map_err(|e| match e {
                L2DumpError::Config(msg) => {
                    L2DumpError::Config(format!("{}: {}", path.display(), msg))
                }
                other => other,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(L2DumpError::Io(e)),
        }
    }

    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        Ok(Self::load(path)?.unwrap_or_else(|| {
            warn!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        }))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        Level::from_str(&self.logging.level).map_err(|_| {
            L2DumpError::Config(format!("unknown log level '{}'", self.logging.level))
        })?;

        if self.dump.tables.is_empty() {
            return Err(L2DumpError::Config(
                "dump.tables must name at least one table".to_string(),
            ));
        }

        Ok(())
    }
}
