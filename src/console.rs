//! Stand-in machine for running the bridge without a printer.
//!
//! Commands are logged instead of executed, and every one is acknowledged
//! with `ok` on the acknowledgement channel, like a printer host would.

use paneldue_core::{CommandFault, CommandInterpreter, HeaterSnapshot, HeaterStatusProvider};
use std::time::Instant;
use tokio::sync::mpsc;

/// Interpreter that logs each command and acknowledges it
pub struct ConsoleInterpreter {
    acks: mpsc::UnboundedSender<String>,
    executed: u64,
}

impl ConsoleInterpreter {
    /// Create an interpreter and the acknowledgement stream it writes to
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (acks, rx) = mpsc::unbounded_channel();
        (Self { acks, executed: 0 }, rx)
    }

    /// Number of commands seen so far
    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl CommandInterpreter for ConsoleInterpreter {
    fn execute(&mut self, command: &str) -> Result<(), CommandFault> {
        tracing::info!("panel command: {}", command);
        self.executed += 1;
        self.acks
            .send("ok".to_string())
            .map_err(|_| CommandFault::new(command, "acknowledgement channel closed"))
    }
}

/// Heater that is configured but has no hardware behind it; always cold.
pub struct UnattachedHeater {
    name: String,
    selected: bool,
}

impl UnattachedHeater {
    /// Create a heater reporting 0 °C
    pub fn new(name: impl Into<String>, selected: bool) -> Self {
        Self {
            name: name.into(),
            selected,
        }
    }
}

impl HeaterStatusProvider for UnattachedHeater {
    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self, _now: Instant) -> HeaterSnapshot {
        HeaterSnapshot::new(0.0, 0.0, self.selected)
    }
}
