//! Engine configuration
//!
//! Loaded from a JSON file; every field is optional.
//!
//! ```json
//! {
//!   "min_log_severity": "WARN",
//!   "retention": { "max_runs": 10000, "idle_ttl_secs": 3600 }
//! }
//! ```
//!
//! Retention limits default to unset: runs accumulate until closed.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;
use crate::store::RetentionPolicy;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "PROOF_CONFIG_READ",
            ConfigError::Parse(_) => "PROOF_CONFIG_PARSE",
            ConfigError::Invalid(_) => "PROOF_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default)]
    pub max_runs: Option<usize>,
    #[serde(default)]
    pub idle_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine events below this severity are not logged
    #[serde(default)]
    pub min_log_severity: Severity,
    #[serde(default)]
    pub retention: RetentionConfig,
}

impl EngineConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.retention.max_runs == Some(0) {
            return Err(ConfigError::Invalid("retention.max_runs must be > 0".into()));
        }
        match self.retention.idle_ttl_secs {
            Some(0) => {
                return Err(ConfigError::Invalid("retention.idle_ttl_secs must be > 0".into()))
            }
            Some(secs) if i64::try_from(secs).ok().and_then(Duration::try_seconds).is_none() => {
                return Err(ConfigError::Invalid("retention.idle_ttl_secs is too large".into()))
            }
            _ => {}
        }
        Ok(())
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            max_runs: self.retention.max_runs,
            idle_ttl: self
                .retention
                .idle_ttl_secs
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(Duration::try_seconds),
        }
    }
}
