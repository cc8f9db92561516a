// Fixed-size record reader over a byte stream

use super::decode::decode_record;
use super::{RecordError, Result};
use crate::layout::{DecodedValue, FieldLayout};
use std::io::{ErrorKind, Read};

/// Result of one record read attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Every field was decoded
    Full,
    /// The stream ended after at least one field but before the last one
    Partial { dangling_bytes: usize },
    /// The stream ended before the first field; `dangling_bytes` is non-zero
    /// when it ended inside that field
    End { dangling_bytes: usize },
}

/// Reads records of a fixed layout from a byte stream
pub struct RecordReader<'a, R> {
    inner: R,
    layout: &'a FieldLayout,
    buf: Vec<u8>,
}

impl<'a, R: Read> RecordReader<'a, R> {
    pub fn new(inner: R, layout: &'a FieldLayout) -> Self {
        Self {
            inner,
            layout,
            buf: vec![0u8; layout.record_size()],
        }
    }

    /// Read the next record into `values`, replacing its previous contents.
    ///
    /// On `Partial`, `values` holds the decoded prefix.
    pub fn read_record(&mut self, values: &mut Vec<DecodedValue>) -> Result<ReadOutcome> {
        let filled = fill(&mut self.inner, &mut self.buf).map_err(RecordError::Read)?;
        let consumed = decode_record(self.layout, &self.buf[..filled], values);

        if filled == self.buf.len() {
            return Ok(ReadOutcome::Full);
        }

        let dangling_bytes = filled - consumed;
        if values.is_empty() {
            Ok(ReadOutcome::End { dangling_bytes })
        } else {
            Ok(ReadOutcome::Partial { dangling_bytes })
        }
    }
}

/// Read until `buf` is full or the stream ends, returning the bytes read
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
