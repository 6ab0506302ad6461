//! Runtime configuration for the pipeline services.

use crate::pipeline::domain::{PipelineDomainError, Probability};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the audit timestamp format.
pub const ENV_TIMESTAMP_FORMAT: &str = "DEALFLOW_NOTE_TIMESTAMP_FORMAT";
/// Environment variable holding the fallback suggested probability.
pub const ENV_DEFAULT_PROBABILITY: &str = "DEALFLOW_DEFAULT_PROBABILITY";
/// Environment variable holding the tracing filter directive.
pub const ENV_LOG_FILTER: &str = "DEALFLOW_LOG";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The timestamp format contains an unknown `%` specifier.
    #[error("invalid note timestamp format '{0}'")]
    InvalidTimestampFormat(String),

    /// The fallback probability is out of range.
    #[error(transparent)]
    InvalidProbability(#[from] PipelineDomainError),

    /// The JSON document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration shared by the pipeline services.
///
/// # Examples
///
/// ```
/// use dealflow::config::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.note_timestamp_format, "%Y-%m-%d %H:%M:%S");
/// assert_eq!(config.default_probability.value(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// chrono format string used for notes timestamps.
    pub note_timestamp_format: String,
    /// Suggested probability for stages outside the standard table.
    pub default_probability: Probability,
    /// Tracing filter directive; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            note_timestamp_format: "%Y-%m-%d %H:%M:%S".to_owned(),
            default_probability: Probability::DEFAULT_SUGGESTION,
            log_filter: None,
        }
    }
}

impl PipelineConfig {
    /// Configuration that stamps notes with RFC 3339 UTC timestamps.
    #[must_use]
    pub fn iso8601() -> Self {
        Self {
            note_timestamp_format: "%Y-%m-%dT%H:%M:%SZ".to_owned(),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration document. Missing keys
    /// keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is malformed or a value is
    /// invalid.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps variable names to
    /// values. Unset or blank variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(format) = read(ENV_TIMESTAMP_FORMAT) {
            config.note_timestamp_format = format;
        }
        if let Some(raw) = read(ENV_DEFAULT_PROBABILITY) {
            config.default_probability = Probability::parse(&raw)?;
        }
        config.log_filter = read(ENV_LOG_FILTER);

        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimestampFormat`] when the timestamp
    /// format is empty or contains an unknown specifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let format = self.note_timestamp_format.as_str();
        let has_error = StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
        if format.trim().is_empty() || has_error {
            return Err(ConfigError::InvalidTimestampFormat(format.to_owned()));
        }
        Ok(())
    }
}
