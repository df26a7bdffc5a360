//! Bridge configuration
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats; the default file lives in the
//! platform configuration directory.
//!
//! ```toml
//! serial = "/dev/ttyAMA0"
//! baud = 57600
//! macros = ["HOME", "LEVEL"]
//! extruders = ["extruder", "extruder1"]
//! ```

use crate::error::{ConfigError, SettingsError};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Baud rate PanelDue firmware ships with
pub const DEFAULT_BAUD_RATE: u32 = 57600;

/// Machine name reported in status responses
pub const DEFAULT_MACHINE_NAME: &str = "Klipper";

/// Firmware name reported in status responses
pub const DEFAULT_FIRMWARE_NAME: &str = "Klipper for Duet 2 WiFi/Ethernet";

const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Complete bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Serial device the panel is attached to
    pub serial: String,
    /// Baud rate of the serial link
    pub baud: u32,
    /// Explicit macro names; discovered from the interpreter when absent
    pub macros: Option<Vec<String>>,
    /// Extruder heaters, in the order the panel should list them
    pub extruders: Vec<String>,
    /// Machine name shown by the panel
    pub machine_name: String,
    /// Firmware name shown by the panel
    pub firmware_name: String,
    /// Advance the line-number tracker even when a line is rejected
    pub resync_on_reject: bool,
    /// Delay between serial polls in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            serial: String::new(),
            baud: DEFAULT_BAUD_RATE,
            macros: None,
            extruders: vec!["extruder".to_string()],
            machine_name: DEFAULT_MACHINE_NAME.to_string(),
            firmware_name: DEFAULT_FIRMWARE_NAME.to_string(),
            resync_on_reject: true,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PanelConfig {
    /// Create a config for `serial` with every other value defaulted
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            ..Self::default()
        }
    }

    /// Default config file location (`<config dir>/paneldue/paneldue.toml`)
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("paneldue").join("paneldue.toml"))
            .ok_or_else(|| ConfigError::NoConfigDirectory.into())
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                )
                .into())
            }
        };

        config.validate()?;
        tracing::debug!("Loaded panel config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                )
                .into())
            }
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.serial.trim().is_empty() {
            return Err(ConfigError::MissingKey("serial".to_string()));
        }

        if self.baud == 0 {
            return Err(ConfigError::InvalidValue {
                key: "baud".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "poll_interval_ms".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if let Some(macros) = &self.macros {
            if macros.iter().any(|name| name.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: "macros".to_string(),
                    reason: "macro names must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}
