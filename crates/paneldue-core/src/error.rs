//! Error handling for the PanelDue bridge
//!
//! Provides error types for every layer of the bridge:
//! - Protocol errors (checksum and sequence validation of panel lines)
//! - Command faults (reported by the machine-control interpreter)
//! - Connection errors (serial device open/read/write)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Protocol error type
///
/// Reasons a panel line was rejected by the validator. Rejected lines are
/// dropped and logged; the panel is never sent a NACK.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Trailing checksum does not match the XOR of the line
    #[error("Checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch {
        /// Checksum sent by the panel (-1 when unparseable or missing).
        expected: i64,
        /// Checksum computed over the received bytes.
        actual: i64,
    },

    /// Line number did not follow the last one received
    #[error("Sequence gap: expected line {expected}, received {received}")]
    SequenceGap {
        /// The line number that would have been accepted.
        expected: i64,
        /// The line number carried by the rejected line (-1 when unparseable).
        received: i64,
    },

    /// Checksum and line number were fine but the command is not UTF-8 text
    #[error("Line {sequence} carries a payload that is not valid UTF-8")]
    InvalidEncoding {
        /// Line number of the rejected line.
        sequence: i64,
    },
}

/// A machine-control command that failed to execute.
///
/// Returned by the interpreter as a value; the drain loop logs it and moves on
/// to the next queued command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Command '{command}' failed: {reason}")]
pub struct CommandFault {
    /// The command text that was executed.
    pub command: String,
    /// Why the interpreter rejected it.
    pub reason: String,
}

impl CommandFault {
    /// Create a fault for `command`
    pub fn new(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

/// Connection error type
///
/// Errors talking to the panel over its serial device.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// Failed to open port
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// Invalid connection parameters
    #[error("Invalid connection parameters: {reason}")]
    InvalidParameters {
        /// The reason the parameters are invalid.
        reason: String,
    },

    /// Reading from the panel failed
    #[error("Read from {port} failed: {reason}")]
    ReadFailed {
        /// The port being read.
        port: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// Writing to the panel failed
    #[error("Write to {port} failed: {reason}")]
    WriteFailed {
        /// The port being written.
        port: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// Connection already torn down
    #[error("Connection closed")]
    Closed,
}

/// Main error type for the bridge
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Protocol error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Command fault
    #[error(transparent)]
    Command(#[from] CommandFault),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Outbound payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a protocol error
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Error::Protocol(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
