//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::PingStarterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target: Option<String>,
    pub interval_secs: Option<i64>,
    pub threshold: Option<i64>,
}

impl ConfigOverrides {
    /// Apply every override that was given.
    pub fn apply(&self, config: &mut PingStarterConfig) {
        if let Some(target) = &self.target {
            config.monitor.target = target.clone();
        }
        if let Some(interval) = self.interval_secs {
            config.monitor.interval_secs = interval;
        }
        if let Some(threshold) = self.threshold {
            config.monitor.threshold = threshold;
        }
    }
}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<PingStarterConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PingStarterConfig, ConfigError> {
    load_config_with(Some(path), false, &ConfigOverrides::default())
}

/// Load configuration, apply overrides, then validate.
///
/// When `required` is false a missing file falls back to defaults, so a
/// target given on the command line is enough to run.
pub fn load_config_with(
    path: Option<&Path>,
    required: bool,
    overrides: &ConfigOverrides,
) -> Result<PingStarterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => parse_config(&content)?,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                PingStarterConfig::default()
            }
            Err(e) => return Err(ConfigError::Io(e)),
        },
        None => PingStarterConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
