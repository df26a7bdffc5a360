//! Transport to the panel.
//!
//! The bridge only needs byte-level reads and writes; everything above that
//! lives in [`crate::protocol`].

pub mod serial;

use paneldue_settings::PanelConfig;
use std::io;

/// Byte channel to the panel.
pub trait PanelLink: Send {
    /// Write data to the panel
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Read whatever is available, returning 0 when nothing arrived
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Get the link name
    fn name(&self) -> String;

    /// Close the link
    fn close(&mut self) -> io::Result<()>;
}

/// Serial connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Device path (e.g., "/dev/ttyAMA0", "COM3")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout in milliseconds; keeps reads effectively non-blocking
    pub timeout_ms: u64,
}

impl ConnectionParams {
    /// Create parameters for `port` at `baud_rate`
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            timeout_ms: 10,
        }
    }
}

impl From<&PanelConfig> for ConnectionParams {
    fn from(config: &PanelConfig) -> Self {
        Self::new(config.serial.clone(), config.baud)
    }
}
