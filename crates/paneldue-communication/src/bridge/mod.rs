//! PanelDue bridge
//!
//! [`PanelBridge`] owns everything on the panel side of the connection: the
//! serial link, the receive buffer, the line-number tracker, the command
//! queue and the outbound sequence counter. Nothing else mutates them, so no
//! locking is involved; only the statistics are shared with the outside world.
//!
//! [`BridgeHandle`] runs a bridge on a tokio task.

mod task;

pub use task::BridgeHandle;

use crate::commands::{CommandHandlers, CommandQueue, PanelCommand};
use crate::communication::PanelLink;
use crate::protocol::{LineFramer, MessageValidator, ResponseRouter, SequencePolicy};
use paneldue_core::{CommandFault, CommandInterpreter, ConnectionError, Error};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Bridge counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Complete lines received from the panel
    pub lines_received: u64,
    /// Lines dropped by validation
    pub lines_rejected: u64,
    /// Commands executed successfully
    pub commands_executed: u64,
    /// Commands that faulted
    pub commands_faulted: u64,
    /// Drain activations run
    pub drains_run: u64,
    /// JSON frames written to the panel
    pub frames_sent: u64,
    /// Failed reads from the panel
    pub read_faults: u64,
    /// Failed writes to the panel
    pub write_faults: u64,
}

/// Protocol bridge between the panel and the machine interpreter
pub struct PanelBridge {
    link: Box<dyn PanelLink>,
    framer: LineFramer,
    validator: MessageValidator,
    queue: CommandQueue,
    router: ResponseRouter,
    interpreter: Box<dyn CommandInterpreter>,
    acknowledgements: Option<mpsc::UnboundedReceiver<String>>,
    handlers: CommandHandlers,
    stats: Arc<RwLock<BridgeStats>>,
    read_fault_streak: u64,
}

impl PanelBridge {
    /// Create a bridge with the default sequence policy
    pub fn new(
        link: Box<dyn PanelLink>,
        interpreter: Box<dyn CommandInterpreter>,
        handlers: CommandHandlers,
    ) -> Self {
        Self {
            link,
            framer: LineFramer::new(),
            validator: MessageValidator::new(),
            queue: CommandQueue::new(),
            router: ResponseRouter::new(),
            interpreter,
            acknowledgements: None,
            handlers,
            stats: Arc::new(RwLock::new(BridgeStats::default())),
            read_fault_streak: 0,
        }
    }

    /// Replace the sequence policy
    pub fn with_policy(mut self, policy: SequencePolicy) -> Self {
        self.validator = MessageValidator::with_policy(policy);
        self
    }

    /// Attach the interpreter's acknowledgement stream.
    ///
    /// Acknowledgements are relayed after every interpreter command, so the
    /// panel sees them in the order the commands ran.
    pub fn with_acknowledgements(mut self, rx: mpsc::UnboundedReceiver<String>) -> Self {
        self.acknowledgements = Some(rx);
        self
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> BridgeStats {
        *self.stats.read()
    }

    /// Shared counters, readable while the bridge runs on its task
    pub fn stats_handle(&self) -> Arc<RwLock<BridgeStats>> {
        self.stats.clone()
    }

    /// Pending command queue
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Name of the panel link
    pub fn link_name(&self) -> String {
        self.link.name()
    }

    /// Failed reads since the last successful one
    pub fn consecutive_read_faults(&self) -> u64 {
        self.read_fault_streak
    }

    /// Perform one bounded read from the link and process what arrived.
    ///
    /// Returns the number of bytes read.
    pub fn poll_read(&mut self, buf: &mut [u8]) -> usize {
        match self.link.read(buf) {
            Ok(n) => {
                if self.read_fault_streak > 0 {
                    tracing::info!(
                        "Reads from {} recovered after {} failures",
                        self.link.name(),
                        self.read_fault_streak
                    );
                    self.read_fault_streak = 0;
                }
                if n > 0 {
                    self.receive(&buf[..n]);
                }
                n
            }
            Err(e) => {
                let err = ConnectionError::ReadFailed {
                    port: self.link.name(),
                    reason: e.to_string(),
                };
                // only the first failure of a run is worth a warning
                if self.read_fault_streak == 0 {
                    tracing::warn!("{}", err);
                } else {
                    tracing::trace!("{}", err);
                }
                self.read_fault_streak += 1;
                self.stats.write().read_faults += 1;
                0
            }
        }
    }

    /// Frame, validate and queue a chunk of received bytes
    pub fn receive(&mut self, chunk: &[u8]) {
        for line in self.framer.push(chunk) {
            let parsed = self.validator.validate(&line);

            let mut stats = self.stats.write();
            stats.lines_received += 1;
            if !parsed.is_accepted() {
                stats.lines_rejected += 1;
            }
            drop(stats);

            if !parsed.payload.is_empty() {
                self.queue.enqueue(parsed.payload);
            }
        }
    }

    /// Whether a drain activation is scheduled
    pub fn has_pending_drain(&self) -> bool {
        self.queue.has_pending_drain()
    }

    /// Run the scheduled drain activation, if any.
    ///
    /// Returns the number of commands processed.
    pub fn run_scheduled_drain(&mut self) -> usize {
        if !self.queue.take_drain() {
            return 0;
        }
        self.stats.write().drains_run += 1;

        let mut processed = 0;
        while let Some(command) = self.queue.pop() {
            processed += 1;
            match self.dispatch(&command) {
                Ok(()) => self.stats.write().commands_executed += 1,
                Err(fault) => {
                    tracing::error!("{}", fault);
                    self.stats.write().commands_faulted += 1;
                }
            }
        }
        processed
    }

    fn dispatch(&mut self, command: &str) -> Result<(), CommandFault> {
        match PanelCommand::parse(command) {
            Some(PanelCommand::StatusQuery) => {
                let status = self.handlers.status_query(command, Instant::now());
                self.send_payload(&status);
            }
            Some(PanelCommand::StartPrint) => {
                for derived in self.handlers.start_print(command) {
                    self.queue.enqueue(derived);
                }
            }
            Some(PanelCommand::RunMacro) => {
                if let Some(name) = self.handlers.run_macro(command) {
                    self.queue.enqueue(name);
                }
            }
            Some(PanelCommand::ListDirectory) => {
                let listing = self.handlers.list_directory(command);
                self.send_payload(&listing);
            }
            None => {
                tracing::debug!("Executing {}", command);
                let result = self.interpreter.execute(command);
                self.relay_acknowledgements();
                result?;
            }
        }
        Ok(())
    }

    /// Relay every acknowledgement waiting on the attached stream.
    ///
    /// Returns the number of messages relayed.
    pub fn relay_acknowledgements(&mut self) -> usize {
        let mut relayed = 0;
        while let Some(message) = self
            .acknowledgements
            .as_mut()
            .and_then(|rx| rx.try_recv().ok())
        {
            self.handle_acknowledgement(&message);
            relayed += 1;
        }
        relayed
    }

    /// Relay one message from the interpreter's acknowledgement channel
    pub fn handle_acknowledgement(&mut self, message: &str) {
        for frame in self.router.route(message) {
            self.send_frame(&frame);
        }
    }

    fn send_payload<T: Serialize>(&mut self, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => self.handle_acknowledgement(&json),
            Err(e) => {
                let err = Error::Serialization(e.to_string());
                tracing::warn!("Dropping panel payload: {}", err);
            }
        }
    }

    fn send_frame(&mut self, json: &str) {
        let mut frame = Vec::with_capacity(json.len() + 1);
        frame.extend_from_slice(json.as_bytes());
        frame.push(b'\n');

        match self.link.write(&frame) {
            Ok(_) => {
                tracing::debug!("-> panel: {}", json);
                self.stats.write().frames_sent += 1;
            }
            Err(e) => {
                // the link stays open; the next frame is attempted as usual
                let err = ConnectionError::WriteFailed {
                    port: self.link.name(),
                    reason: e.to_string(),
                };
                tracing::warn!("{}", err);
                self.stats.write().write_faults += 1;
            }
        }
    }

    /// Close the panel link
    pub fn close(&mut self) {
        if let Err(e) = self.link.close() {
            tracing::warn!("Failed to close {}: {}", self.link.name(), e);
        }
        self.framer.reset();
    }
}
