//! Configuration loading and settings resolution
//!
//! Every setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The TOML file is the one given with `--config`, else
//! `<config dir>/afbt/config.toml`. A missing default file is not an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const ENV_ANNOTATION_FILE: &str = "AFBT_ANNOTATION_FILE";
pub const ENV_MATCHES_FILE: &str = "AFBT_MATCHES_FILE";
pub const ENV_OUTPUT_CSV_FILE: &str = "AFBT_OUTPUT_CSV_FILE";
pub const ENV_LEVEL: &str = "AFBT_LEVEL";
pub const ENV_LOG_LEVEL: &str = "AFBT_LOG_LEVEL";

pub const DEFAULT_ANNOTATION_FILE: &str = "annotations.csv";
pub const DEFAULT_MATCHES_FILE: &str = "matches.csv";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Which evaluation tiers to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationLevel {
    /// Track presence only
    Files,
    /// Segment-level evaluators only
    Seconds,
    #[default]
    All,
}

impl EvaluationLevel {
    pub fn includes_tracks(self) -> bool {
        matches!(self, Self::Files | Self::All)
    }

    pub fn includes_segments(self) -> bool {
        matches!(self, Self::Seconds | Self::All)
    }
}

impl FromStr for EvaluationLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "files" => Ok(Self::Files),
            "seconds" => Ok(Self::Seconds),
            "all" => Ok(Self::All),
            other => Err(Error::InvalidInput(format!(
                "Unknown evaluation level '{}' (expected files, seconds or all)",
                other
            ))),
        }
    }
}

impl fmt::Display for EvaluationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Files => "files",
            Self::Seconds => "seconds",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

/// Configuration loaded from TOML file
///
/// All fields are optional; unset fields fall through to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub annotation_file: Option<PathBuf>,

    #[serde(default)]
    pub matches_file: Option<PathBuf>,

    #[serde(default)]
    pub output_csv_file: Option<PathBuf>,

    /// files, seconds or all
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// Default TOML location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("afbt").join("config.toml"))
}

/// Parse TOML configuration text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
}

/// Config file to read, if any
///
/// An explicit path is returned as is, to fail later if it does not exist.
/// The default location only counts when the file is present.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    }
}

/// Read and parse one TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    parse_toml_config(&content)
}

/// Load the TOML config
///
/// An explicit path must exist. Without one, a missing default file
/// yields an empty config.
///
/// Callers that load the config before logging is set up should use
/// [`locate_config_file`] and [`read_toml_config`] and report the source
/// themselves.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    match locate_config_file(explicit) {
        Some(path) => {
            let config = read_toml_config(&path)?;
            debug!(path = %path.display(), "Loaded config file");
            Ok(config)
        }
        None => {
            debug!("No config file, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub annotation_file: Option<PathBuf>,
    pub matches_file: Option<PathBuf>,
    pub output_csv_file: Option<PathBuf>,
    pub level: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved settings of an evaluation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSettings {
    pub annotation_file: PathBuf,
    pub matches_file: PathBuf,
    pub output_csv_file: Option<PathBuf>,
    pub level: EvaluationLevel,
    pub log_level: String,
}

/// Non-empty environment variable
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl EvaluationSettings {
    /// Resolve every setting: CLI, then ENV, then TOML, then default
    pub fn resolve(cli: SettingsOverrides, toml: &TomlConfig) -> Result<Self> {
        let annotation_file = cli
            .annotation_file
            .or_else(|| env_value(ENV_ANNOTATION_FILE).map(PathBuf::from))
            .or_else(|| toml.annotation_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ANNOTATION_FILE));

        let matches_file = cli
            .matches_file
            .or_else(|| env_value(ENV_MATCHES_FILE).map(PathBuf::from))
            .or_else(|| toml.matches_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MATCHES_FILE));

        let output_csv_file = cli
            .output_csv_file
            .or_else(|| env_value(ENV_OUTPUT_CSV_FILE).map(PathBuf::from))
            .or_else(|| toml.output_csv_file.clone());

        let level = match cli
            .level
            .or_else(|| env_value(ENV_LEVEL))
            .or_else(|| toml.level.clone())
        {
            Some(level) => level.parse()?,
            None => EvaluationLevel::default(),
        };

        let log_level = cli
            .log_level
            .or_else(|| env_value(ENV_LOG_LEVEL))
            .or_else(|| toml.logging.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            annotation_file,
            matches_file,
            output_csv_file,
            level,
            log_level,
        })
    }
}
