//! # PanelDue Communication
//!
//! The serial protocol spoken by PanelDue touch panels, bridged to a machine
//! interpreter:
//! - line framing and checksum/line-number validation of panel commands
//! - an ordered command queue drained outside the receive path
//! - handlers for the status, print, macro and listing commands
//! - routing of interpreter output back to the panel as JSON

pub mod bridge;
pub mod commands;
pub mod communication;
pub mod protocol;

pub use bridge::{BridgeHandle, BridgeStats, PanelBridge};
pub use commands::{
    CommandHandlers, CommandQueue, DeviceIdentity, MacroCatalog, PanelCommand, QueueStats,
    MACRO_DIRECTORY,
};
pub use communication::{
    serial::{list_ports, RealSerialPort, SerialPortInfo},
    ConnectionParams, PanelLink,
};
pub use protocol::{
    LineFramer, MessageValidator, Outbound, ParsedLine, ResponseRouter, SequencePolicy,
};
