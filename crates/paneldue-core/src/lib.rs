//! # PanelDue Core
//!
//! Core types, collaborator traits, and errors for the PanelDue bridge.
//! Everything the bridge needs from the machine it is attached to is expressed
//! here as a trait, so the protocol layer can be driven by real hardware or by
//! test doubles alike.

pub mod collaborators;
pub mod error;
pub mod status;

pub use collaborators::{
    CommandInterpreter, HeaterStatusProvider, StorageProvider, StoredFile, Toolhead,
    PRINTING_STATUS,
};
pub use error::{CommandFault, ConnectionError, Error, ProtocolError, Result};
pub use status::{HeaterSnapshot, MachineState};
