use serde::{Deserialize, Serialize};
use std::path::Path;

use super::constants::{DEFAULT_LOG_MARKER, DEFAULT_STIM_TOKEN, DEFAULT_THRESHOLD};
use super::error::ConfigError;

/// Structure representing the alignment configuration.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub threshold: f64,
    pub log_marker: String,
    pub stim_token: usize,
}

impl Default for Config {
    /// Generate a Config matching the jill/jstim defaults
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            log_marker: String::from(DEFAULT_LOG_MARKER),
            stim_token: DEFAULT_STIM_TOKEN,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file, overwriting anything already there
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }
}
