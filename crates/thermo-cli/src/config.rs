//! Client configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thermo_session::{ConfigError, SessionConfig};

/// Address used when neither the file nor the command line names one.
pub const DEFAULT_ADDR: &str = "127.0.0.1:7070";

/// Contents of a `thermoctl` YAML config file.
///
/// ```yaml
/// addr: 192.168.1.40:7070
/// session:
///   timeout_ms: 1500
///   protocol_retries: 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Device address, `host:port`.
    pub addr: String,
    pub session: SessionConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            addr: DEFAULT_ADDR.to_string(),
            session: SessionConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = serde_yaml::from_str(yaml)?;
        config.session.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }
}
