//! Newline framing of the raw serial byte stream.

/// Accumulates serial reads and splits them into complete lines.
///
/// Bytes after the last newline are held until a later chunk completes them.
/// There is no line-length cap: a peer that never sends a newline grows the
/// buffer without bound.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    /// Create an empty framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and return the lines it completed, oldest first.
    ///
    /// Lines are raw bytes trimmed of surrounding ASCII whitespace; lines that
    /// are blank after trimming are skipped. No decoding happens here.
    pub fn push(&mut self, chunk: &[u8]) -> Lines {
        self.buffer.extend_from_slice(chunk);

        let complete = match self.buffer.iter().rposition(|&b| b == b'\n') {
            Some(pos) => {
                let remainder = self.buffer.split_off(pos + 1);
                std::mem::replace(&mut self.buffer, remainder)
            }
            None => Vec::new(),
        };

        Lines {
            data: complete,
            pos: 0,
        }
    }

    /// Number of buffered bytes waiting for a newline
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Lines completed by one [`LineFramer::push`].
#[derive(Debug)]
pub struct Lines {
    data: Vec<u8>,
    pos: usize,
}

impl Iterator for Lines {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        while self.pos < self.data.len() {
            let end = self.data[self.pos..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(self.data.len(), |offset| self.pos + offset);

            let line = self.data[self.pos..end].trim_ascii();
            self.pos = end + 1;

            if !line.is_empty() {
                return Some(line.to_vec());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: Lines) -> Vec<String> {
        lines
            .map(|line| String::from_utf8(line).unwrap())
            .collect()
    }

    #[test]
    fn test_partial_line_is_retained() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push(b"N1 M40").count(), 0);
        assert_eq!(framer.pending_len(), 6);

        assert_eq!(text(framer.push(b"8*20\nN2")), vec!["N1 M408*20"]);
        assert_eq!(framer.pending_len(), 2);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut framer = LineFramer::new();
        assert_eq!(text(framer.push(b"a\r\n  b  \n\nc\n")), vec!["a", "b", "c"]);
        assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn test_empty_chunk() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push(b"").count(), 0);
        framer.push(b"abc");
        assert_eq!(framer.push(b"").count(), 0);
        assert_eq!(framer.pending_len(), 3);
    }

    #[test]
    fn test_no_duplication_across_calls() {
        let mut framer = LineFramer::new();
        assert_eq!(text(framer.push(b"one\n")), vec!["one"]);
        assert_eq!(text(framer.push(b"two\n")), vec!["two"]);
    }

    #[test]
    fn test_bytes_pass_through_undecoded() {
        let mut framer = LineFramer::new();
        let lines: Vec<Vec<u8>> = framer.push(b"caf\xe9\n").collect();
        assert_eq!(lines, vec![b"caf\xe9".to_vec()]);
    }

    #[test]
    fn test_reset() {
        let mut framer = LineFramer::new();
        framer.push(b"garbage");
        framer.reset();
        assert_eq!(text(framer.push(b"ok\n")), vec!["ok"]);
    }
}
