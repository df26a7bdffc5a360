//! Handlers for the commands the bridge answers itself.

use super::macros::{MacroCatalog, MACRO_DIRECTORY};
use super::{path_argument, selector_argument, strip_keyword};
use crate::protocol::messages::{DirectoryListing, StatusResponse};
use paneldue_core::{HeaterStatusProvider, MachineState, StorageProvider, Toolhead};
use paneldue_settings::{PanelConfig, DEFAULT_FIRMWARE_NAME, DEFAULT_MACHINE_NAME};
use std::time::Instant;

/// Tool count reported in status responses.
///
/// Always 1, whatever the number of configured extruders.
pub const NUM_TOOLS: u32 = 1;

/// Directory listed when `M20` carries no path
pub const GCODE_DIRECTORY: &str = "0:/gcodes";

const MACRO_PREFIX: &str = "0:/macros/";
const HSTAT_ACTIVE: u8 = 2;
const HSTAT_OFF: u8 = 0;
const MAX_SELECTOR: i64 = 3;

/// Names the panel shows for the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Machine name
    pub machine_name: String,
    /// Firmware name
    pub firmware_name: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            machine_name: DEFAULT_MACHINE_NAME.to_string(),
            firmware_name: DEFAULT_FIRMWARE_NAME.to_string(),
        }
    }
}

impl From<&PanelConfig> for DeviceIdentity {
    fn from(config: &PanelConfig) -> Self {
        Self {
            machine_name: config.machine_name.clone(),
            firmware_name: config.firmware_name.clone(),
        }
    }
}

/// Status, print, macro and listing handlers with the collaborators they read.
pub struct CommandHandlers {
    identity: DeviceIdentity,
    catalog: MacroCatalog,
    toolhead: Option<Box<dyn Toolhead>>,
    bed: Option<Box<dyn HeaterStatusProvider>>,
    extruders: Vec<Box<dyn HeaterStatusProvider>>,
    storage: Option<Box<dyn StorageProvider>>,
}

impl CommandHandlers {
    /// Create handlers with no machine collaborators attached
    pub fn new(identity: DeviceIdentity, catalog: MacroCatalog) -> Self {
        Self {
            identity,
            catalog,
            toolhead: None,
            bed: None,
            extruders: Vec::new(),
            storage: None,
        }
    }

    /// Attach the toolhead
    pub fn with_toolhead(mut self, toolhead: Box<dyn Toolhead>) -> Self {
        self.toolhead = Some(toolhead);
        self
    }

    /// Attach the heated bed
    pub fn with_bed(mut self, bed: Box<dyn HeaterStatusProvider>) -> Self {
        self.bed = Some(bed);
        self
    }

    /// Append an extruder heater; status slots follow attachment order
    pub fn with_extruder(mut self, extruder: Box<dyn HeaterStatusProvider>) -> Self {
        self.extruders.push(extruder);
        self
    }

    /// Attach the storage provider
    pub fn with_storage(mut self, storage: Box<dyn StorageProvider>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Macro catalog
    pub fn catalog(&self) -> &MacroCatalog {
        &self.catalog
    }

    /// Build the `M408` status response
    pub fn status_query(&self, command: &str, now: Instant) -> StatusResponse {
        // The selector picks a response variant on Duet firmware; only the
        // basic variant exists here.
        if let Some(selector) = selector_argument(command) {
            if (0..=MAX_SELECTOR).contains(&selector) {
                tracing::debug!("Status query with selector {}", selector);
            } else {
                tracing::warn!("Status selector {} out of range 0-{}", selector, MAX_SELECTOR);
            }
        }

        let status = match &self.toolhead {
            Some(toolhead) => MachineState::from_toolhead_status(&toolhead.status(now)),
            None => MachineState::Idle,
        };

        let mut response = StatusResponse {
            status,
            my_name: self.identity.machine_name.clone(),
            firmware_name: self.identity.firmware_name.clone(),
            num_tools: NUM_TOOLS,
            heaters: Vec::with_capacity(self.extruders.len() + 1),
            active: Vec::with_capacity(self.extruders.len() + 1),
            standby: Vec::with_capacity(self.extruders.len() + 1),
            hstat: Vec::with_capacity(self.extruders.len() + 1),
        };

        match &self.bed {
            Some(bed) => {
                let snapshot = bed.snapshot(now);
                push_heater(
                    &mut response,
                    snapshot.current_temperature,
                    snapshot.target_temperature,
                    HSTAT_ACTIVE,
                );
            }
            None => push_heater(&mut response, 0.0, 0.0, HSTAT_OFF),
        }

        for extruder in &self.extruders {
            let snapshot = extruder.snapshot(now);
            tracing::trace!(
                "{}: {:.1}/{:.1} selected={}",
                extruder.name(),
                snapshot.current_temperature,
                snapshot.target_temperature,
                snapshot.is_selected
            );
            let hstat = if snapshot.is_selected {
                HSTAT_ACTIVE
            } else {
                HSTAT_OFF
            };
            push_heater(
                &mut response,
                snapshot.current_temperature,
                snapshot.target_temperature,
                hstat,
            );
        }

        tracing::debug!("Status response: {:?}", response);
        response
    }

    /// `M32 <path>`: the commands that select and start the file
    pub fn start_print(&self, command: &str) -> Vec<String> {
        let path = strip_keyword(command);
        if path.is_empty() {
            tracing::warn!("Ignoring '{}': no file given", command);
            return Vec::new();
        }

        tracing::info!("Starting stored print {}", path);
        vec![format!("M23 {}", path), "M24".to_string()]
    }

    /// `M98 P<path>`: the macro to run, if the path is in the macro directory
    pub fn run_macro(&self, command: &str) -> Option<String> {
        let path = path_argument(command)?;
        match path.strip_prefix(MACRO_PREFIX) {
            Some(name) if !name.is_empty() => {
                tracing::info!("Running macro {}", name);
                Some(name.to_string())
            }
            _ => {
                tracing::debug!("Ignoring macro path outside {}: {}", MACRO_DIRECTORY, path);
                None
            }
        }
    }

    /// `M20 P<path>`: directory listing
    pub fn list_directory(&self, command: &str) -> DirectoryListing {
        let dir = path_argument(command).unwrap_or(GCODE_DIRECTORY);

        let files = if dir.trim_end_matches('/') == MACRO_DIRECTORY {
            self.catalog.names().to_vec()
        } else {
            match &self.storage {
                Some(storage) => storage.list_files().into_iter().map(|f| f.name).collect(),
                None => {
                    tracing::debug!("No storage attached; listing {} as empty", dir);
                    Vec::new()
                }
            }
        };

        DirectoryListing {
            dir: dir.to_string(),
            files,
        }
    }
}

fn push_heater(response: &mut StatusResponse, current: f64, target: f64, hstat: u8) {
    let target = round_tenths(target);
    response.heaters.push(round_tenths(current));
    response.active.push(target);
    // no separate standby setpoint exists; mirror the active one
    response.standby.push(target);
    response.hstat.push(hstat);
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
