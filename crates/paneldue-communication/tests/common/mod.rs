#![allow(dead_code)]

use paneldue_communication::PanelLink;
use paneldue_core::{
    CommandFault, CommandInterpreter, HeaterSnapshot, HeaterStatusProvider, StorageProvider,
    StoredFile, Toolhead,
};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Default)]
pub struct LinkState {
    pub inbound: VecDeque<Vec<u8>>,
    pub written: Vec<u8>,
    pub closed: bool,
    pub fail_writes: bool,
    pub fail_reads: bool,
}

/// In-memory panel link; the test keeps the shared state.
pub struct MockLink {
    pub state: Arc<Mutex<LinkState>>,
}

impl MockLink {
    pub fn new() -> (Self, Arc<Mutex<LinkState>>) {
        let state = Arc::new(Mutex::new(LinkState::default()));
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl PanelLink for MockLink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "panel unplugged"));
        }
        state.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "panel unplugged"));
        }
        match state.inbound.pop_front() {
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    state.inbound.push_front(chunk[n..].to_vec());
                }
                Ok(n)
            }
            None => Ok(0),
        }
    }

    fn name(&self) -> String {
        "mock".to_string()
    }

    fn close(&mut self) -> io::Result<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

/// JSON frames written so far
pub fn written_frames(state: &Arc<Mutex<LinkState>>) -> Vec<String> {
    let state = state.lock().unwrap();
    String::from_utf8_lossy(&state.written)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Records executed commands; faults on any command listed in `failing`.
pub struct RecordingInterpreter {
    pub executed: Arc<Mutex<Vec<String>>>,
    pub failing: Vec<String>,
    pub registered: Vec<String>,
    pub acks: Option<mpsc::UnboundedSender<String>>,
}

impl RecordingInterpreter {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let executed = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                executed: executed.clone(),
                failing: Vec::new(),
                registered: Vec::new(),
                acks: None,
            },
            executed,
        )
    }

    pub fn failing_on(mut self, command: &str) -> Self {
        self.failing.push(command.to_string());
        self
    }

    pub fn with_acks(mut self, tx: mpsc::UnboundedSender<String>) -> Self {
        self.acks = Some(tx);
        self
    }
}

impl CommandInterpreter for RecordingInterpreter {
    fn execute(&mut self, command: &str) -> Result<(), CommandFault> {
        if self.failing.iter().any(|c| c == command) {
            if let Some(tx) = &self.acks {
                let _ = tx.send(format!("!! Unknown command:\"{}\"", command));
            }
            return Err(CommandFault::new(command, "unknown command"));
        }
        self.executed.lock().unwrap().push(command.to_string());
        if let Some(tx) = &self.acks {
            let _ = tx.send("ok".to_string());
        }
        Ok(())
    }

    fn command_names(&self) -> Vec<String> {
        self.registered.clone()
    }
}

pub struct FixedHeater(pub &'static str, pub HeaterSnapshot);

impl HeaterStatusProvider for FixedHeater {
    fn name(&self) -> &str {
        self.0
    }

    fn snapshot(&self, _now: Instant) -> HeaterSnapshot {
        self.1
    }
}

pub struct FixedToolhead(pub &'static str);

impl Toolhead for FixedToolhead {
    fn status(&self, _now: Instant) -> String {
        self.0.to_string()
    }
}

pub struct FixedStorage(pub Vec<StoredFile>);

impl StorageProvider for FixedStorage {
    fn list_files(&self) -> Vec<StoredFile> {
        self.0.clone()
    }
}
