//! Configuration for the ingest tool.
//!
//! Everything has a default, so running without a config file works and a
//! TOML file only needs the keys it wants to change.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
}

/// Description of the logger hardware, passed through to the store when
/// channels are registered.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device name recorded alongside imported series
    pub name: String,
    /// Nominal inertial sample rate (Hz). Metadata only; reconstructed
    /// times come from the stream itself, not from this value.
    pub sample_rate: u32,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Defaults matching the OpenIMU wearable logger.
    pub fn openimu_defaults() -> Self {
        Self {
            device: DeviceConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::openimu_defaults()
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "OpenIMU-HW".to_string(),
            sample_rate: 50,
        }
    }
}
