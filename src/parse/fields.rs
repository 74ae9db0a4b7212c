//! Zero-copy splitter for single-delimiter rows

/// Byte range of one field within its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub start: usize,
    pub len: usize,
}

impl FieldSpan {
    #[inline]
    pub fn slice<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        &line[self.start..self.start + self.len]
    }
}

/// Split `line` on `delimiter` into `spans`, stopping after `max_fields`
///
/// `spans` is cleared first so one buffer can be reused across a whole file.
/// Once `max_fields` fields have been cut the rest of the line is never
/// scanned.
pub fn split_fields(line: &[u8], delimiter: u8, max_fields: usize, spans: &mut Vec<FieldSpan>) {
    spans.clear();
    if max_fields == 0 {
        return;
    }

    let mut start = 0;
    for (pos, &byte) in line.iter().enumerate() {
        if byte == delimiter {
            spans.push(FieldSpan { start, len: pos - start });
            if spans.len() == max_fields {
                return;
            }
            start = pos + 1;
        }
    }
    spans.push(FieldSpan { start, len: line.len() - start });
}

/// A split row: the line bytes together with its field spans
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    line: &'a [u8],
    spans: &'a [FieldSpan],
}

impl<'a> Fields<'a> {
    pub fn new(line: &'a [u8], spans: &'a [FieldSpan]) -> Self {
        Self { line, spans }
    }

    /// Number of fields cut from the line
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Field bytes, or `None` past the end of the row
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.spans.get(index).map(|span| span.slice(self.line))
    }

    /// True when the field is missing or empty
    #[inline]
    pub fn is_blank(&self, index: usize) -> bool {
        self.get(index).map_or(true, <[u8]>::is_empty)
    }
}
