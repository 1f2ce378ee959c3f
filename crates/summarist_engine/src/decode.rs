//! Pure NDJSON line decoding for the processing stream.

use crate::StreamEvent;

/// Accumulates raw bytes across reads and yields only complete,
/// newline-terminated lines. A partial line split across two reads is
/// retained until its terminator arrives, so it decodes as exactly one
/// candidate, never as two truncated fragments.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pops the next complete line, without its terminator (CR trimmed).
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }

    /// Any unterminated remainder, leaving the buffer empty.
    pub fn take_remainder(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}

/// Parses one candidate line into a [`StreamEvent`].
///
/// Empty lines yield `None`. A line that is not valid JSON, or does not
/// match a known record shape, is logged and skipped; it never terminates
/// the stream.
pub fn parse_stream_line(line: &[u8]) -> Option<StreamEvent> {
    if line.iter().all(|b| b.is_ascii_whitespace()) {
        return None;
    }
    match serde_json::from_slice(line) {
        Ok(event) => Some(event),
        Err(err) => {
            log::warn!(
                "skipping malformed stream line ({err}): {}",
                String::from_utf8_lossy(line)
            );
            None
        }
    }
}
