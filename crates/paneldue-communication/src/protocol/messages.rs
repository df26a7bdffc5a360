//! JSON payloads sent to the panel.
//!
//! Field names follow the RepRapFirmware `M408` response format the panel
//! firmware parses.

use paneldue_core::MachineState;
use serde::Serialize;

/// `M408` status response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Printing or idle
    pub status: MachineState,
    /// Machine name
    pub my_name: String,
    /// Firmware name
    pub firmware_name: String,
    /// Number of tools
    pub num_tools: u32,
    /// Current temperature per heater, bed first
    pub heaters: Vec<f64>,
    /// Active setpoint per heater
    pub active: Vec<f64>,
    /// Standby setpoint per heater
    pub standby: Vec<f64>,
    /// Heater state code per heater (2 = active, 0 = off)
    pub hstat: Vec<u8>,
}

/// `M20` directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    /// Directory that was listed
    pub dir: String,
    /// Entry names
    pub files: Vec<String>,
}

/// Informational message relayed from the machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoResponse {
    /// Message text
    pub resp: String,
    /// Outbound sequence number
    pub seq: u64,
}

/// Error message relayed from the machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Message text
    pub message: String,
}
