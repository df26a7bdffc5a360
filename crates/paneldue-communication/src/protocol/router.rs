//! Response Router
//!
//! Classifies text produced by the machine-control interpreter and decides
//! what, if anything, the panel gets to see:
//! - `// ...` informational lines become `{"resp": ..., "seq": N}`
//! - `!! ...` errors become `{"message": ...}`
//! - `{...}` payloads are already JSON and pass through untouched
//! - everything else (plain acknowledgements) is dropped

use super::messages::{ErrorResponse, InfoResponse};
use paneldue_core::{Error, Result};

const INFO_PREFIX: &str = "//";
const ERROR_PREFIX: &str = "!!";

/// Classified interpreter output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Informational message
    Info(InfoResponse),
    /// Error message
    Error(ErrorResponse),
    /// Pre-built JSON payload
    Structured(String),
}

impl Outbound {
    /// Serialize to the JSON text sent on the wire
    pub fn to_json(&self) -> Result<String> {
        match self {
            Self::Info(info) => {
                serde_json::to_string(info).map_err(|e| Error::Serialization(e.to_string()))
            }
            Self::Error(err) => {
                serde_json::to_string(err).map_err(|e| Error::Serialization(e.to_string()))
            }
            Self::Structured(json) => Ok(json.clone()),
        }
    }
}

/// Response router; owns the outbound sequence counter.
#[derive(Debug, Default)]
pub struct ResponseRouter {
    last_seq: u64,
}

impl ResponseRouter {
    /// Create a new router
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number of the most recent info message (0 before the first)
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Classify one interpreter message
    pub fn classify(&mut self, message: &str) -> Vec<Outbound> {
        let message = message.trim();

        if message.starts_with(INFO_PREFIX) {
            message
                .split(INFO_PREFIX)
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(|segment| {
                    self.last_seq += 1;
                    Outbound::Info(InfoResponse {
                        resp: segment.to_string(),
                        seq: self.last_seq,
                    })
                })
                .collect()
        } else if let Some(text) = message.strip_prefix(ERROR_PREFIX) {
            vec![Outbound::Error(ErrorResponse {
                message: text.trim().to_string(),
            })]
        } else if message.starts_with('{') {
            vec![Outbound::Structured(message.to_string())]
        } else {
            tracing::trace!("Not relaying to panel: {}", message);
            Vec::new()
        }
    }

    /// Classify and serialize; returns the JSON frames to send
    pub fn route(&mut self, message: &str) -> Vec<String> {
        self.classify(message)
            .iter()
            .filter_map(|outbound| match outbound.to_json() {
                Ok(json) => Some(json),
                Err(e) => {
                    tracing::warn!("Failed to encode panel message: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_message() {
        let mut router = ResponseRouter::new();
        assert_eq!(router.route("// hello"), vec![r#"{"resp":"hello","seq":1}"#]);
        assert_eq!(router.route("// again"), vec![r#"{"resp":"again","seq":2}"#]);
        assert_eq!(router.last_seq(), 2);
    }

    #[test]
    fn test_info_segments() {
        let mut router = ResponseRouter::new();
        let frames = router.route("// Klipper state: Ready\n// Printer is ready");
        assert_eq!(
            frames,
            vec![
                r#"{"resp":"Klipper state: Ready","seq":1}"#,
                r#"{"resp":"Printer is ready","seq":2}"#,
            ]
        );
    }

    #[test]
    fn test_empty_info_segments_skipped() {
        let mut router = ResponseRouter::new();
        assert!(router.route("//   //").is_empty());
        assert_eq!(router.last_seq(), 0);
    }

    #[test]
    fn test_error_message() {
        let mut router = ResponseRouter::new();
        assert_eq!(router.route("!!oops"), vec![r#"{"message":"oops"}"#]);
        assert_eq!(
            router.route("!! Must home axis first"),
            vec![r#"{"message":"Must home axis first"}"#]
        );
        assert_eq!(router.last_seq(), 0);
    }

    #[test]
    fn test_structured_passthrough() {
        let mut router = ResponseRouter::new();
        let json = r#"{"dir":"0:/gcodes","files":[]}"#;
        assert_eq!(router.route(json), vec![json]);
    }

    #[test]
    fn test_plain_text_dropped() {
        let mut router = ResponseRouter::new();
        assert!(router.route("plain text").is_empty());
        assert!(router.route("ok").is_empty());
        assert!(router.route("").is_empty());
    }
}
