// Inbound framing for the stdio transport

use bytes::BytesMut;
use std::io;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};

/// Upper bound for a single inbound message line
pub const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// One framed line from the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A complete UTF-8 line
    Line(String),
    /// A line that was not valid UTF-8 or exceeded the length limit.
    /// It has been consumed; the next line decodes normally.
    Malformed(String),
}

/// Newline-delimited decoder that reports bad lines as items.
///
/// `FramedRead` stops after the first decoder error, so per-line faults
/// are surfaced as `Inbound::Malformed` and only I/O failures are errors.
#[derive(Debug, Clone)]
pub struct MessageCodec {
    lines: LinesCodec,
}

impl MessageCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_MESSAGE_BYTES)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_length),
        }
    }
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn recover(result: Result<Option<String>, LinesCodecError>) -> Result<Option<Inbound>, LinesCodecError> {
    match result {
        Ok(line) => Ok(line.map(Inbound::Line)),
        Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Inbound::Malformed(
            LinesCodecError::MaxLineLengthExceeded.to_string(),
        ))),
        Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
            Ok(Some(Inbound::Malformed(e.to_string())))
        }
        Err(e) => Err(e),
    }
}

impl Decoder for MessageCodec {
    type Item = Inbound;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Inbound>, LinesCodecError> {
        recover(self.lines.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Inbound>, LinesCodecError> {
        recover(self.lines.decode_eof(buf))
    }
}
