use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};

use crate::decode::{parse_stream_line, LineBuffer};
use crate::{StreamError, StreamEvent};

/// Lazily decodes a processing response body into [`StreamEvent`]s.
///
/// Single-use: one instance is scoped to one stream open/close cycle.
/// The sequence ends with `Ok(None)` when the body is exhausted; a
/// transport error mid-read is terminal.
pub struct EventStream {
    body: BoxStream<'static, Result<Bytes, reqwest::Error>>,
    buffer: LineBuffer,
    exhausted: bool,
}

impl EventStream {
    pub(crate) fn new(body: BoxStream<'static, Result<Bytes, reqwest::Error>>) -> Self {
        Self {
            body,
            buffer: LineBuffer::new(),
            exhausted: false,
        }
    }

    /// The next decoded event, skipping malformed lines.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>, StreamError> {
        loop {
            while let Some(line) = self.buffer.next_line() {
                if let Some(event) = parse_stream_line(&line) {
                    return Ok(Some(event));
                }
            }
            if self.exhausted {
                return Ok(None);
            }
            match self.body.next().await {
                Some(Ok(chunk)) => self.buffer.extend(&chunk),
                Some(Err(err)) => return Err(StreamError::Read(err)),
                None => {
                    self.exhausted = true;
                    let leftover = self.buffer.take_remainder();
                    if !leftover.is_empty() {
                        log::debug!(
                            "dropping {} unterminated trailing bytes from processing stream",
                            leftover.len()
                        );
                    }
                    return Ok(None);
                }
            }
        }
    }
}
