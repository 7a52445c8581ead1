//! Session configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default per-call deadline.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Default quiet period that ends a resynchronization drain.
pub const DEFAULT_DRAIN_QUIET_MS: u64 = 50;

/// Timing and retry policy of a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Deadline for a whole exchange, including any resync drain.
    pub timeout_ms: u64,
    /// How long the line must stay silent before a drain is considered done.
    pub drain_quiet_ms: u64,
    /// How many times a call that hit a protocol error is re-issued.
    pub protocol_retries: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            drain_quiet_ms: DEFAULT_DRAIN_QUIET_MS,
            protocol_retries: 0,
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn drain_quiet(&self) -> Duration {
        Duration::from_millis(self.drain_quiet_ms)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be non-zero".to_string()));
        }
        if self.drain_quiet_ms == 0 {
            return Err(ConfigError::Invalid(
                "drain_quiet_ms must be non-zero".to_string(),
            ));
        }
        if self.drain_quiet_ms >= self.timeout_ms {
            return Err(ConfigError::Invalid(format!(
                "drain_quiet_ms ({}) must be shorter than timeout_ms ({})",
                self.drain_quiet_ms, self.timeout_ms
            )));
        }
        Ok(())
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.drain_quiet(), Duration::from_millis(50));
        assert_eq!(config.protocol_retries, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SessionConfig::from_yaml_str("timeout_ms: 500\n").unwrap();
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.drain_quiet_ms, DEFAULT_DRAIN_QUIET_MS);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "timeout_ms: 1000\ndrain_quiet_ms: 20\nprotocol_retries: 1\n";
        let config = SessionConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(
            config,
            SessionConfig {
                timeout_ms: 1000,
                drain_quiet_ms: 20,
                protocol_retries: 1,
            }
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            SessionConfig::from_yaml_str("timeout: 5\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SessionConfig::from_yaml_str("timeout_ms: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_yaml_str("timeout_ms: 100\ndrain_quiet_ms: 100\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = SessionConfig {
            timeout_ms: 750,
            drain_quiet_ms: 25,
            protocol_retries: 2,
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
