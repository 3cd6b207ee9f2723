//! # Configuration
//!
//! Settings come from four layers, highest precedence first:
//! 1. CLI flags (`--snapshot`)
//! 2. Environment (`SUBSCRIBE_SNAPSHOT`, `SUBSCRIBE_LOG_FORMAT`, `RUST_LOG`)
//! 3. The TOML file named by `--config`
//! 4. Built-in defaults
//!
//! ```toml
//! [catalog]
//! snapshot = "subscriptions.sub"
//!
//! [log]
//! format = "text"   # or "json"
//! filter = "subscribe=info"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use subscribe_core::SubscribeError;

pub const DEFAULT_SNAPSHOT: &str = "subscriptions.sub";
pub const DEFAULT_LOG_FILTER: &str = "subscribe=info";

pub const ENV_SNAPSHOT: &str = "SUBSCRIBE_SNAPSHOT";
pub const ENV_LOG_FORMAT: &str = "SUBSCRIBE_LOG_FORMAT";
pub const ENV_LOG_FILTER: &str = "RUST_LOG";

/// Upper bound on a config file read from disk.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// FILE LAYER
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = SubscribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(SubscribeError::DeserializationError(format!(
                "Unknown log format '{}'. Use: text, json",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub format: Option<LogFormat>,
    pub filter: Option<String>,
}

/// Contents of `subscribe.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub catalog: CatalogSection,
    pub log: LogSection,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, SubscribeError> {
        toml::from_str(text).map_err(|e| {
            SubscribeError::DeserializationError(format!("Invalid config: {}", e))
        })
    }

    pub fn load(path: &Path) -> Result<Self, SubscribeError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            SubscribeError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(SubscribeError::IoError(format!(
                "Config file {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            SubscribeError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::parse(&text)
    }
}

// =============================================================================
// RESOLVED SETTINGS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub snapshot: PathBuf,
    pub log_format: LogFormat,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from(DEFAULT_SNAPSHOT),
            log_format: LogFormat::Text,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Merge every layer. `env` looks up one environment variable.
    pub fn resolve(
        config_path: Option<&Path>,
        cli_snapshot: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SubscribeError> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(file, cli_snapshot, env)
    }

    fn merge(
        file: FileConfig,
        cli_snapshot: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SubscribeError> {
        let defaults = Self::default();
        let env = |key: &str| env(key).filter(|value| !value.is_empty());

        let snapshot = cli_snapshot
            .map(Path::to_path_buf)
            .or_else(|| env(ENV_SNAPSHOT).map(PathBuf::from))
            .or(file.catalog.snapshot)
            .unwrap_or(defaults.snapshot);

        let log_format = match env(ENV_LOG_FORMAT) {
            Some(value) => value.parse()?,
            None => file.log.format.unwrap_or(defaults.log_format),
        };

        let log_filter = env(ENV_LOG_FILTER)
            .or(file.log.filter)
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            snapshot,
            log_format,
            log_filter,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
