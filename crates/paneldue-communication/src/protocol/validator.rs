//! Checksum and line-number validation of panel lines.
//!
//! Panel lines have the form `N<seq> <payload>*<checksum>`, where the checksum
//! is the XOR of every byte before the final `*`.

use paneldue_core::ProtocolError;

/// Value used for a line number or checksum that could not be parsed.
///
/// Never equal to a computed checksum, so an unparseable checksum always
/// fails validation.
pub const INVALID: i64 = -1;

/// XOR of every byte in `data`
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, b| acc ^ b)
}

/// Build a well-formed panel line (without the trailing newline)
pub fn frame_line(sequence: i64, payload: &str) -> String {
    let body = format!("N{} {}", sequence, payload);
    let sum = checksum(body.as_bytes());
    format!("{}*{}", body, sum)
}

/// How the line-number tracker treats rejected lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencePolicy {
    /// Record the line number of rejected lines too, so the next line is
    /// checked against the rejected one rather than the last accepted one.
    pub resync_on_reject: bool,
}

impl Default for SequencePolicy {
    fn default() -> Self {
        Self {
            resync_on_reject: true,
        }
    }
}

/// Result of validating one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Line number, or [`INVALID`]
    pub sequence_number: i64,
    /// Command text; empty when the line was rejected
    pub payload: String,
    /// Why the line was rejected, if it was
    pub rejection: Option<ProtocolError>,
}

impl ParsedLine {
    /// Whether the line passed validation
    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Validates panel lines against their checksum and the previous line number.
#[derive(Debug, Default)]
pub struct MessageValidator {
    last_sequence: Option<i64>,
    policy: SequencePolicy,
}

impl MessageValidator {
    /// Create a validator with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with an explicit policy
    pub fn with_policy(policy: SequencePolicy) -> Self {
        Self {
            last_sequence: None,
            policy,
        }
    }

    /// Last recorded line number
    pub fn last_sequence(&self) -> Option<i64> {
        self.last_sequence
    }

    /// Forget the last line number; the next line is exempt from the gap check
    pub fn reset(&mut self) {
        self.last_sequence = None;
    }

    /// Parse and validate a trimmed line.
    ///
    /// The checksum and line number are taken from the raw bytes; the payload
    /// is decoded only once the line has passed both checks.
    pub fn validate(&mut self, line: impl AsRef<[u8]>) -> ParsedLine {
        let line = line.as_ref();
        let star = line.iter().rposition(|&b| b == b'*');
        let space = line.iter().position(|&b| b == b' ');

        let expected = star
            .and_then(|i| parse_number(&line[i + 1..]))
            .unwrap_or(INVALID);

        let sequence_number = space
            .and_then(|i| line.get(1..i))
            .and_then(parse_number)
            .unwrap_or(INVALID);

        let end = star.unwrap_or(line.len());
        let payload = match space {
            Some(i) if end > i => &line[i + 1..end],
            _ => &[][..],
        };

        let actual = i64::from(checksum(&line[..end]));

        let checked = match self.last_sequence {
            Some(prior) if prior.checked_add(1) != Some(sequence_number) => {
                Err(ProtocolError::SequenceGap {
                    expected: prior.saturating_add(1),
                    received: sequence_number,
                })
            }
            _ if actual != expected => Err(ProtocolError::ChecksumMismatch { expected, actual }),
            _ => std::str::from_utf8(payload)
                .map(str::to_string)
                .map_err(|_| ProtocolError::InvalidEncoding {
                    sequence: sequence_number,
                }),
        };

        let (payload, rejection) = match checked {
            Ok(payload) => {
                tracing::debug!("Accepted line {}: {}", sequence_number, payload);
                (payload, None)
            }
            Err(reason) => {
                tracing::warn!(
                    "Dropping panel line '{}': {}",
                    String::from_utf8_lossy(line),
                    reason
                );
                (String::new(), Some(reason))
            }
        };

        if rejection.is_none() || self.policy.resync_on_reject {
            self.last_sequence = Some(sequence_number);
        }

        ParsedLine {
            sequence_number,
            payload,
            rejection,
        }
    }
}

fn parse_number(digits: &[u8]) -> Option<i64> {
    std::str::from_utf8(digits).ok()?.trim().parse().ok()
}
