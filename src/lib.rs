//! # PanelDue Bridge
//!
//! Connects a PanelDue touch panel to a 3D printer's command interpreter over
//! a serial line:
//! - checksummed, line-numbered G-code commands arrive from the panel
//! - commands run in arrival order, outside the receive path
//! - status, listing and console output go back to the panel as JSON
//!
//! ## Architecture
//!
//! 1. **paneldue-core** - Error taxonomy, collaborator traits, status types
//! 2. **paneldue-settings** - Configuration files and validation
//! 3. **paneldue-communication** - Serial port, protocol, command queue, bridge task
//! 4. **paneldue** - Binary that wires configuration, serial port and bridge together

pub mod console;

pub use console::{ConsoleInterpreter, UnattachedHeater};

pub use paneldue_communication::{
    list_ports, BridgeHandle, BridgeStats, CommandHandlers, ConnectionParams, DeviceIdentity,
    MacroCatalog, PanelBridge, PanelLink, RealSerialPort, SequencePolicy, SerialPortInfo,
};
pub use paneldue_core::{
    CommandFault, CommandInterpreter, ConnectionError, Error, HeaterSnapshot, HeaterStatusProvider,
    MachineState, ProtocolError, Result,
};
pub use paneldue_settings::{ConfigError, PanelConfig, SettingsError};

use std::path::PathBuf;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Load the bridge configuration; the file is validated on load.
///
/// Uses `path` when given, the platform default location otherwise.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<PanelConfig> {
    let path = match path {
        Some(path) => path,
        None => PanelConfig::default_path()?,
    };

    tracing::info!("Loading configuration from {}", path.display());
    let config = PanelConfig::load_from_file(&path)?;
    Ok(config)
}

/// Build a bridge for `config` on top of an already opened link.
///
/// `extruders` are reported to the panel in the order given.
pub fn build_bridge(
    config: &PanelConfig,
    link: Box<dyn PanelLink>,
    interpreter: Box<dyn CommandInterpreter>,
    extruders: Vec<Box<dyn HeaterStatusProvider>>,
) -> PanelBridge {
    let catalog = MacroCatalog::from_config(config.macros.as_deref(), interpreter.as_ref());
    tracing::info!("{} macros available to the panel", catalog.len());

    let handlers = extruders.into_iter().fold(
        CommandHandlers::new(DeviceIdentity::from(config), catalog),
        CommandHandlers::with_extruder,
    );
    PanelBridge::new(link, interpreter, handlers).with_policy(SequencePolicy {
        resync_on_reject: config.resync_on_reject,
    })
}
