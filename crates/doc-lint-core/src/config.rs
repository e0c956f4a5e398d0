//! Configuration types for doc-lint.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Tool options that request non-public members.
pub const PRIVACY_FLAGS: &[&str] = &["--private", "--protected"];

/// Default failure threshold.
pub const DEFAULT_FAIL_ON_SEVERITY: &str = "warning";

/// Top-level configuration for doc-lint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold at which the run fails (default: "warning").
    ///
    /// Kept as a raw string: unknown values fail open instead of
    /// rejecting the whole configuration.
    #[serde(default = "default_fail_on_severity")]
    pub fail_on_severity: String,

    /// Minimum documentation coverage percentage, if enforced.
    #[serde(default)]
    pub min_coverage: Option<f64>,

    /// Settings shared by every validator.
    #[serde(default)]
    pub all_validators: AllValidatorsConfig,

    /// Per-validator configurations, keyed by validator name.
    #[serde(default)]
    pub validators: HashMap<String, ValidatorConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_on_severity: default_fail_on_severity(),
            min_coverage: None,
            all_validators: AllValidatorsConfig::default(),
            validators: HashMap::new(),
        }
    }
}

fn default_fail_on_severity() -> String {
    DEFAULT_FAIL_ON_SEVERITY.to_string()
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Returns the configuration block for a validator, if any.
    #[must_use]
    pub fn validator(&self, name: &str) -> Option<&ValidatorConfig> {
        self.validators.get(name)
    }

    /// Checks if a validator is enabled. Validators are enabled unless
    /// explicitly turned off.
    #[must_use]
    pub fn is_validator_enabled(&self, name: &str) -> bool {
        self.validator(name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a validator.
    #[must_use]
    pub fn validator_severity(&self, name: &str) -> Option<Severity> {
        self.validator(name).and_then(|c| c.severity)
    }

    /// Exclude patterns applying to a validator: the global ones followed
    /// by the validator's own.
    #[must_use]
    pub fn validator_exclude(&self, name: &str) -> Vec<String> {
        let mut patterns = self.all_validators.exclude.clone();
        if let Some(config) = self.validator(name) {
            patterns.extend(config.exclude.iter().cloned());
        }
        patterns
    }

    /// Gets a validator-specific passthrough option.
    #[must_use]
    pub fn validator_option(&self, name: &str, key: &str) -> Option<&toml::Value> {
        self.validator(name).and_then(|c| c.options.get(key))
    }

    /// The validator's own tool option list.
    ///
    /// `Some(&[])` means the list was set explicitly to empty, which is
    /// different from not being set at all.
    #[must_use]
    pub fn validator_tool_options(&self, name: &str) -> Option<&[String]> {
        self.validator(name)
            .and_then(|c| c.tool_options.as_deref())
    }

    /// The global tool option list, if set.
    #[must_use]
    pub fn global_tool_options(&self) -> Option<&[String]> {
        self.all_validators.tool_options.as_deref()
    }

    /// Tool options passed to a shell-based validator: its own list when
    /// present, otherwise the global one.
    #[must_use]
    pub fn effective_tool_options(&self, name: &str) -> &[String] {
        self.validator_tool_options(name)
            .or_else(|| self.global_tool_options())
            .unwrap_or_default()
    }

    /// Parses `fail_on_severity`. Returns `None` for unrecognized values.
    #[must_use]
    pub fn fail_on(&self) -> Option<Severity> {
        self.fail_on_severity.parse().ok()
    }
}

/// Settings shared by all validators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllValidatorsConfig {
    /// Options forwarded to the documentation tool (e.g. `--private`).
    #[serde(default)]
    pub tool_options: Option<Vec<String>>,

    /// Glob patterns excluded for every validator.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Per-validator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Whether this validator is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this validator.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Tool options for this validator; overrides the global list even
    /// when empty.
    #[serde(default)]
    pub tool_options: Option<Vec<String>>,

    /// Additional glob patterns excluded for this validator.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Validator-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl ValidatorConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Returns true if an option list asks for non-public members.
#[must_use]
pub fn has_privacy_flag(options: &[String]) -> bool {
    options
        .iter()
        .any(|opt| PRIVACY_FLAGS.contains(&opt.as_str()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
