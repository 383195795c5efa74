//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `NUTNR_*` environment variables. Command line flags are applied last by the
//! CLI itself.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::app::models::DataMode;
use crate::constants::{DCL_FULL_LOG_SUFFIX, DEFAULT_BATCH_SIZE, DEFAULT_LOG_LEVEL, ENV_PREFIX};
use crate::{Error, Result};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Delivery mode selecting the published particle streams
    pub mode: DataMode,

    /// Units of work pulled from a parser before publishing
    pub batch_size: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            mode: DataMode::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// File discovery and output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Directory for JSON lines output; stdout when unset
    pub output_path: Option<PathBuf>,

    /// Maximum number of files parsed at once
    pub max_concurrent_files: usize,

    /// Suffix matched when walking input directories
    pub file_suffix: String,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            output_path: None,
            max_concurrent_files: num_cpus::get().max(1),
            file_suffix: DCL_FULL_LOG_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Global configuration for NUTNR processing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserSettings,
    pub processing: ProcessingSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Default location of the user configuration file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nutnr-processor").join("config.toml"))
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn from_toml_str(content: &str, file: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config_file(file, e))
    }

    /// Build the configuration from defaults, a TOML file and the environment
    ///
    /// An explicit `config_file` must exist. Without one, the default path is
    /// used only if a file is present there.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::file_not_found(path.display().to_string()));
                }
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => match Self::default_config_path().filter(|path| path.exists()) {
                Some(path) => {
                    debug!("Loading configuration from {}", path.display());
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `NUTNR_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up by full variable name
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&name).map(|value| (name, value))
        };

        if let Some((_, value)) = var("MODE") {
            self.parser.mode = value.parse()?;
        }
        if let Some((name, value)) = var("BATCH_SIZE") {
            self.parser.batch_size = parse_count(&name, &value)?;
        }
        if let Some((name, value)) = var("MAX_CONCURRENT_FILES") {
            self.processing.max_concurrent_files = parse_count(&name, &value)?;
        }
        if let Some((_, value)) = var("OUTPUT_PATH") {
            self.processing.output_path = Some(PathBuf::from(value));
        }
        if let Some((_, value)) = var("LOG_LEVEL") {
            self.logging.level = value.to_lowercase();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.parser.batch_size == 0 {
            return Err(Error::configuration("batch_size must be greater than zero"));
        }
        if self.processing.max_concurrent_files == 0 {
            return Err(Error::configuration(
                "max_concurrent_files must be greater than zero",
            ));
        }
        if self.processing.file_suffix.is_empty() {
            return Err(Error::configuration("file_suffix must not be empty"));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "Unknown log level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Override the delivery mode
    pub fn with_mode(mut self, mode: DataMode) -> Self {
        self.parser.mode = mode;
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.processing.max_concurrent_files = max_files;
        self
    }

    /// Write particles under `path` instead of stdout
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.processing.output_path = Some(path.into());
        self
    }
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        Error::configuration(format!("{} must be a positive integer, got '{}'", name, value))
    })
}
