//! Translation policy configuration.
//!
//! Supports loading the policy from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QBRIDGE_ prefix)
//!
//! Precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding [`TranslationPolicy::box_unknown_ops`].
pub const ENV_BOX_UNKNOWN: &str = "QBRIDGE_BOX_UNKNOWN";
/// Environment variable overriding [`TranslationPolicy::drop_conditions`].
pub const ENV_DROP_CONDITIONS: &str = "QBRIDGE_DROP_CONDITIONS";

/// How the forward translator treats constructs it cannot carry exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationPolicy {
    /// Turn unknown operations into opaque boxes instead of failing.
    #[serde(default = "default_true")]
    pub box_unknown_ops: bool,

    /// Discard classical conditions instead of failing.
    #[serde(default)]
    pub drop_conditions: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TranslationPolicy {
    fn default() -> Self {
        Self {
            box_unknown_ops: default_true(),
            drop_conditions: false,
        }
    }
}

impl TranslationPolicy {
    /// Fail on every unknown operation and every condition.
    pub fn strict() -> Self {
        Self {
            box_unknown_ops: false,
            drop_conditions: false,
        }
    }

    /// Set whether unknown operations are boxed.
    #[must_use]
    pub fn with_box_unknown(mut self, enabled: bool) -> Self {
        self.box_unknown_ops = enabled;
        self
    }

    /// Set whether conditions are dropped.
    #[must_use]
    pub fn with_drop_conditions(mut self, enabled: bool) -> Self {
        self.drop_conditions = enabled;
        self
    }

    /// Load a policy from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Load with precedence env > file > defaults.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let policy = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        policy.with_env_overrides()
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup(ENV_BOX_UNKNOWN) {
            self.box_unknown_ops = parse_flag(ENV_BOX_UNKNOWN, &v)?;
        }
        if let Some(v) = lookup(ENV_DROP_CONDITIONS) {
            self.drop_conditions = parse_flag(ENV_DROP_CONDITIONS, &v)?;
        }
        Ok(self)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::ValidationError(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
