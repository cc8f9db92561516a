// Line printer for decoded records

use super::{RecordError, Result, StreamPosition};
use crate::layout::DecodedValue;
use crate::template::Template;
use std::io::Write;

/// Writes one line per record, optionally prefixed with offset and index
pub struct Printer<W: Write> {
    out: W,
    show_offset: bool,
    show_index: bool,
    line: String,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_offset: false,
            show_index: false,
            line: String::new(),
        }
    }

    /// Prefix each line with the record's byte offset (`%07x `)
    pub fn with_offset(mut self, show: bool) -> Self {
        self.show_offset = show;
        self
    }

    /// Prefix each line with the record count (`N: `)
    pub fn with_index(mut self, show: bool) -> Self {
        self.show_index = show;
        self
    }

    /// Print one record; `values` may be shorter than the template for a
    /// partial record
    pub fn print_record(
        &mut self,
        position: &StreamPosition,
        template: &Template,
        values: &[DecodedValue],
    ) -> Result<()> {
        self.line.clear();
        if self.show_offset {
            self.line.push_str(&format!("{:07x} ", position.offset));
        }
        if self.show_index {
            self.line.push_str(&format!("{}: ", position.records));
        }
        template.render(values, &mut self.line);
        self.line.push('\n');

        self.out
            .write_all(self.line.as_bytes())
            .map_err(RecordError::Write)
    }

    /// Print the offset-only line that closes a stream, if offsets are shown
    pub fn print_final_offset(&mut self, position: &StreamPosition) -> Result<()> {
        if !self.show_offset {
            return Ok(());
        }
        writeln!(self.out, "{:07x} ", position.offset).map_err(RecordError::Write)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(RecordError::Write)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
