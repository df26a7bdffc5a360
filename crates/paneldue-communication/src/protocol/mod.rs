//! PanelDue line protocol
//!
//! Inbound: newline framing, then checksum and line-number validation.
//! Outbound: JSON payloads, filtered through the response router.

pub mod framer;
pub mod messages;
pub mod router;
pub mod validator;

pub use framer::{LineFramer, Lines};
pub use messages::{DirectoryListing, ErrorResponse, InfoResponse, StatusResponse};
pub use router::{Outbound, ResponseRouter};
pub use validator::{
    checksum, frame_line, MessageValidator, ParsedLine, SequencePolicy, INVALID,
};
