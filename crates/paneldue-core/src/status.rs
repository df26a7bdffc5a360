//! Fixed-shape machine status values.

use serde::Serialize;

/// One heater reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeaterSnapshot {
    /// Measured temperature in °C
    pub current_temperature: f64,
    /// Setpoint in °C
    pub target_temperature: f64,
    /// Whether this heater belongs to the currently selected tool
    pub is_selected: bool,
}

impl HeaterSnapshot {
    /// Create a new snapshot
    pub fn new(current_temperature: f64, target_temperature: f64, is_selected: bool) -> Self {
        Self {
            current_temperature,
            target_temperature,
            is_selected,
        }
    }
}

/// Machine state as reported to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MachineState {
    /// A print is running
    #[serde(rename = "P")]
    Printing,
    /// Anything else
    #[serde(rename = "I")]
    Idle,
}

impl MachineState {
    /// Map a toolhead status string onto the panel's two states
    pub fn from_toolhead_status(status: &str) -> Self {
        if status == crate::collaborators::PRINTING_STATUS {
            Self::Printing
        } else {
            Self::Idle
        }
    }

    /// Single-letter code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::Printing => "P",
            Self::Idle => "I",
        }
    }
}

impl std::fmt::Display for MachineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_state_from_status() {
        assert_eq!(
            MachineState::from_toolhead_status("Printing"),
            MachineState::Printing
        );
        assert_eq!(MachineState::from_toolhead_status("Ready"), MachineState::Idle);
        assert_eq!(MachineState::from_toolhead_status("printing"), MachineState::Idle);
        assert_eq!(MachineState::from_toolhead_status(""), MachineState::Idle);
    }

    #[test]
    fn test_machine_state_code() {
        assert_eq!(MachineState::Printing.to_string(), "P");
        assert_eq!(MachineState::Idle.code(), "I");
    }
}
