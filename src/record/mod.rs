// Record read/print loop
pub mod decode;
pub mod printer;
pub mod reader;

pub use decode::{decode_record, parse_field};
pub use printer::Printer;
pub use reader::{ReadOutcome, RecordReader};

use crate::layout::FieldLayout;
use crate::template::Template;
use std::io::{self, Read, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("While reading data: {0}")]
    Read(io::Error),

    #[error("While writing output: {0}")]
    Write(io::Error),
}

pub type Result<T> = std::result::Result<T, RecordError>;

/// Running byte offset and record count of the input stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamPosition {
    /// Offset of the current record; advances by the record size even for a
    /// partial record
    pub offset: u64,
    /// Read attempts that produced at least one field
    pub records: u64,
}

impl StreamPosition {
    fn advance(&mut self, record_size: usize) {
        self.offset += record_size as u64;
    }
}

/// How the read loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The stream ended on a record boundary
    CleanEnd,
    /// The stream ended inside a record. `fields` whole fields of it were
    /// decoded (and printed if non-zero); `dangling_bytes` more belonged to a
    /// field that could not be completed.
    InsufficientTrailingData { fields: usize, dangling_bytes: usize },
}

impl Termination {
    /// Informational message for a stream that ended mid-record
    pub fn notice(&self) -> Option<String> {
        match self {
            Termination::CleanEnd => None,
            Termination::InsufficientTrailingData { dangling_bytes, .. } if *dangling_bytes > 0 => {
                Some(format!(
                    "EOF: final data not enough for the last field ({} trailing bytes ignored)",
                    dangling_bytes
                ))
            }
            Termination::InsufficientTrailingData { .. } => {
                Some("EOF: final data not enough for the last record".to_string())
            }
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub position: StreamPosition,
    pub termination: Termination,
}

/// Decode `input` record by record and print each one until the stream ends.
///
/// A record cut short by the end of the stream is printed with the fields
/// that were decoded. A read error aborts the loop without printing the
/// record it interrupted.
pub fn run<R: Read, W: Write>(
    input: R,
    layout: &FieldLayout,
    template: &Template,
    printer: &mut Printer<W>,
) -> Result<RunSummary> {
    let mut reader = RecordReader::new(input, layout);
    let mut position = StreamPosition::default();
    let mut values = Vec::with_capacity(layout.len());

    let termination = loop {
        match reader.read_record(&mut values)? {
            ReadOutcome::Full => {
                position.records += 1;
                printer.print_record(&position, template, &values)?;
                position.advance(layout.record_size());
            }
            ReadOutcome::Partial { dangling_bytes } => {
                position.records += 1;
                printer.print_record(&position, template, &values)?;
                position.advance(layout.record_size());
                break Termination::InsufficientTrailingData {
                    fields: values.len(),
                    dangling_bytes,
                };
            }
            ReadOutcome::End { dangling_bytes } => {
                printer.print_final_offset(&position)?;
                if dangling_bytes == 0 {
                    break Termination::CleanEnd;
                }
                break Termination::InsufficientTrailingData {
                    fields: 0,
                    dangling_bytes,
                };
            }
        }
    };
    printer.flush()?;

    match termination {
        Termination::CleanEnd => {
            tracing::debug!(
                "End of stream after {} records ({} bytes)",
                position.records,
                position.offset
            );
        }
        Termination::InsufficientTrailingData {
            fields,
            dangling_bytes,
        } => {
            tracing::warn!(
                "Stream ended mid-record: {} of {} fields decoded, {} trailing bytes",
                fields,
                layout.len(),
                dangling_bytes
            );
        }
    }

    Ok(RunSummary {
        position,
        termination,
    })
}
