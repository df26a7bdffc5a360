//! Serial port communication implementation
//!
//! Provides the serial link to the panel. PanelDue boards are wired either to
//! a host UART (`/dev/ttyAMA*`, `/dev/ttyS*`) or through a USB adapter.
//!
//! Supports:
//! - Port enumeration for diagnostics
//! - 8N1 framing at the configured baud rate
//! - Short-timeout reads that behave as non-blocking polls

use super::{ConnectionParams, PanelLink};
use paneldue_core::{ConnectionError, Result};
use std::io::{self, Read, Write};
use std::time::Duration;

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyAMA0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
        }
    }
}

/// List serial ports a panel could be attached to
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    match serialport::available_ports() {
        Ok(ports) => Ok(ports
            .iter()
            .filter(|port| is_panel_port(&port.port_name))
            .map(|port| SerialPortInfo::new(&port.port_name, get_port_description(port)))
            .collect()),
        Err(e) => {
            tracing::error!("Failed to enumerate serial ports: {}", e);
            Err(paneldue_core::Error::other(format!(
                "Failed to enumerate ports: {}",
                e
            )))
        }
    }
}

/// Check if a port name matches a UART or USB serial device
fn is_panel_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }

    const PREFIXES: [&str; 6] = [
        "/dev/ttyAMA",
        "/dev/ttyS",
        "/dev/ttyUSB",
        "/dev/ttyACM",
        "/dev/cu.usbserial-",
        "/dev/cu.usbmodem",
    ];
    PREFIXES.iter().any(|prefix| port_name.starts_with(prefix))
}

fn get_port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Real serial port implementation using serialport crate
pub struct RealSerialPort {
    name: String,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl RealSerialPort {
    /// Open a serial port with the given parameters
    pub fn open(params: &ConnectionParams) -> Result<Self> {
        if params.baud_rate == 0 {
            return Err(ConnectionError::InvalidParameters {
                reason: "baud rate must be > 0".to_string(),
            }
            .into());
        }

        let port = serialport::new(&params.port, params.baud_rate)
            .timeout(Duration::from_millis(params.timeout_ms))
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|e| {
                tracing::warn!("Failed to open serial port {}: {}", params.port, e);
                ConnectionError::FailedToOpen {
                    port: params.port.clone(),
                    reason: e.to_string(),
                }
            })?;

        tracing::info!("Opened {} at {} baud", params.port, params.baud_rate);
        Ok(Self {
            name: params.port.clone(),
            port: Some(port),
        })
    }

    fn port_mut(&mut self) -> io::Result<&mut Box<dyn serialport::SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, ConnectionError::Closed))
    }
}

impl PanelLink for RealSerialPort {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let port = self.port_mut()?;
        port.write_all(data)?;
        port.flush()?;
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.port_mut()?.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn close(&mut self) -> io::Result<()> {
        if self.port.take().is_some() {
            tracing::info!("Closed {}", self.name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_port_patterns() {
        assert!(is_panel_port("/dev/ttyAMA0"));
        assert!(is_panel_port("/dev/ttyS2"));
        assert!(is_panel_port("/dev/ttyUSB0"));
        assert!(is_panel_port("COM3"));
        assert!(!is_panel_port("COMX"));
        assert!(!is_panel_port("COM"));
        assert!(!is_panel_port("/dev/null"));
    }

    #[test]
    fn test_closed_port_refuses_io() {
        let mut port = RealSerialPort {
            name: "/dev/ttyAMA0".to_string(),
            port: None,
        };
        let err = port.write(b"{}\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        assert_eq!(err.to_string(), "Connection closed");
        assert!(port.close().is_ok());
    }

    #[test]
    fn test_open_rejects_zero_baud() {
        let params = ConnectionParams::new("/dev/ttyAMA0", 0);
        assert!(matches!(
            RealSerialPort::open(&params),
            Err(paneldue_core::Error::Connection(
                ConnectionError::InvalidParameters { .. }
            ))
        ));
    }
}
