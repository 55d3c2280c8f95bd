//! Immutable text snapshot with line bookkeeping.
//!
//! Wraps the original source text with a precomputed line-start table so the
//! formatter can map offsets to physical lines and read substrings without
//! rescanning. Line ends exclude the terminator; `\r\n` counts as one
//! terminator.

use crate::span::Span;

/// Immutable view over one version of a source text.
#[derive(Debug)]
pub struct TextSnapshot<'a> {
    text: &'a str,
    line_starts: Vec<u32>,
}

impl<'a> TextSnapshot<'a> {
    /// Build a snapshot over the given text.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0u32];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        TextSnapshot { text, line_starts }
    }

    /// The full source text.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Total length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    /// Check if the snapshot is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Read the text covered by a span.
    pub fn slice(&self, span: Span) -> &'a str {
        &self.text[span.start as usize..span.end as usize]
    }

    /// Number of physical lines. An empty text has one (empty) line.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Index of the line containing the given offset.
    ///
    /// Offsets at or past the end of text map to the last line.
    pub fn line_index_of(&self, offset: u32) -> u32 {
        let following = self.line_starts.partition_point(|&start| start <= offset);
        following as u32 - 1
    }

    /// Byte offset of the first character of a line.
    pub fn line_start(&self, line: u32) -> u32 {
        self.line_starts[line as usize]
    }

    /// Byte offset just past the last character of a line, excluding the
    /// line terminator.
    pub fn line_end(&self, line: u32) -> u32 {
        let next = line as usize + 1;
        if next < self.line_starts.len() {
            let mut end = self.line_starts[next] - 1; // drop '\n'
            if end > self.line_starts[line as usize] && self.text.as_bytes()[end as usize - 1] == b'\r' {
                end -= 1; // drop '\r' of a CRLF pair
            }
            end
        } else {
            self.len()
        }
    }

    /// Text of a line, excluding the terminator.
    pub fn line_text(&self, line: u32) -> &'a str {
        &self.text[self.line_start(line) as usize..self.line_end(line) as usize]
    }
}
