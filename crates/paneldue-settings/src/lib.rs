//! PanelDue Settings Crate
//!
//! Handles the bridge configuration: which serial device the panel is on,
//! how fast it talks, and how the bridge presents the machine to it.

pub mod config;
pub mod error;

pub use config::{PanelConfig, DEFAULT_BAUD_RATE, DEFAULT_FIRMWARE_NAME, DEFAULT_MACHINE_NAME};
pub use error::{ConfigError, SettingsError};

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;
