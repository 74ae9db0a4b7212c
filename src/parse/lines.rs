//! Header-skipping row reader over any buffered source

use std::io::{self, BufRead};

use super::fields::{split_fields, FieldSpan, Fields};
use super::numeric::normalize_decimal;
use super::DELIMITER;

/// Reads data rows after a discarded header line
///
/// Each non-empty line has its line terminator stripped, every `,` rewritten
/// to `.`, and is split into at most `max_fields` fields. The line and span
/// buffers are reused between rows.
pub struct DataLines<R> {
    reader: R,
    line: Vec<u8>,
    spans: Vec<FieldSpan>,
    max_fields: usize,
}

impl<R: BufRead> DataLines<R> {
    /// Wrap `reader`, consuming its header line
    pub fn new(mut reader: R, max_fields: usize) -> io::Result<Self> {
        let mut line = Vec::with_capacity(256);
        reader.read_until(b'\n', &mut line)?;
        line.clear();

        Ok(Self {
            reader,
            line,
            spans: Vec::with_capacity(max_fields.min(64)),
            max_fields,
        })
    }

    /// Next non-empty data row, or `None` at end of input
    pub fn next_row(&mut self) -> io::Result<Option<Fields<'_>>> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            while matches!(self.line.last(), Some(b'\n' | b'\r')) {
                self.line.pop();
            }
            if self.line.is_empty() {
                continue;
            }

            normalize_decimal(&mut self.line);
            split_fields(&self.line, DELIMITER, self.max_fields, &mut self.spans);
            return Ok(Some(Fields::new(&self.line, &self.spans)));
        }
    }
}
