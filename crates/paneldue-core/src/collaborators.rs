//! Interfaces to the machine the panel is attached to.
//!
//! The bridge never looks collaborators up by name at run time; each one is
//! handed to it at construction as a trait object.

use crate::error::CommandFault;
use crate::status::HeaterSnapshot;
use std::time::Instant;

/// Toolhead status string that means a print is in progress.
pub const PRINTING_STATUS: &str = "Printing";

/// Machine-control command interpreter.
pub trait CommandInterpreter: Send {
    /// Execute a single command synchronously.
    fn execute(&mut self, command: &str) -> Result<(), CommandFault>;

    /// Names of all commands registered with the interpreter.
    ///
    /// Used to discover macros when none are configured explicitly.
    fn command_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Toolhead state source.
pub trait Toolhead: Send {
    /// Current status string, e.g. `"Printing"`, `"Ready"`, `"Idle"`.
    fn status(&self, now: Instant) -> String;
}

/// Source of temperature readings for one heater (bed or extruder).
pub trait HeaterStatusProvider: Send {
    /// Configured name of the heater, e.g. `"heater_bed"` or `"extruder1"`.
    fn name(&self) -> &str;

    /// Read the heater's current state.
    fn snapshot(&self, now: Instant) -> HeaterSnapshot;
}

/// A file known to the storage provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// File name as shown on the panel
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl StoredFile {
    /// Create a new entry
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Inventory of stored print files.
pub trait StorageProvider: Send {
    /// List every stored file.
    fn list_files(&self) -> Vec<StoredFile>;
}
