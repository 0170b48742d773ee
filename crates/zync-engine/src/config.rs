//! Engine configuration.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZyncError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Window used when a caller does not say how many days to search.
    pub default_days_to_check: u32,
    /// Upper bound on a recommendation window.
    pub max_days_to_check: u32,
    /// Per-fetch deadline; a fetch that misses it counts as a provider failure.
    pub fetch_timeout_ms: Option<u64>,
    /// Spacing of candidate meeting starts.
    pub candidate_step_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_days_to_check: 5,
            max_days_to_check: 31,
            fetch_timeout_ms: None,
            candidate_step_minutes: 60,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `ZyncError::InvalidInput` for zero-valued limits or a default window
    /// larger than the maximum.
    pub fn validate(&self) -> Result<()> {
        if self.default_days_to_check == 0 || self.max_days_to_check == 0 {
            return Err(ZyncError::InvalidInput(
                "days_to_check limits must be at least 1".to_string(),
            ));
        }
        if self.default_days_to_check > self.max_days_to_check {
            return Err(ZyncError::InvalidInput(format!(
                "default_days_to_check ({}) exceeds max_days_to_check ({})",
                self.default_days_to_check, self.max_days_to_check
            )));
        }
        if self.fetch_timeout_ms == Some(0) {
            return Err(ZyncError::InvalidInput(
                "fetch_timeout_ms must be positive".to_string(),
            ));
        }
        if self.candidate_step_minutes == 0 {
            return Err(ZyncError::InvalidInput(
                "candidate_step_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<std::time::Duration> {
        self.fetch_timeout_ms.map(std::time::Duration::from_millis)
    }

    pub fn candidate_step(&self) -> Duration {
        Duration::minutes(i64::from(self.candidate_step_minutes))
    }
}
