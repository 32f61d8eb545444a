//! Source location tracking.
//!
//! Every node and token carries a `Span`: a byte range into the source plus
//! the line/column of both ends. Lines are 1-based; columns are 0-based and
//! counted in UTF-16 code units, which is what ESTree consumers expect.

use serde::Serialize;

/// A line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// The `loc` object of an ESTree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

/// A point in the source: byte offset plus its line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Marker {
    pub offset: u32,
    pub pos: Position,
}

/// A range in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
    pub loc: SourceLocation,
}

impl Span {
    /// Create a span covering `start..end`.
    pub fn between(start: Marker, end: Marker) -> Self {
        Self {
            start: start.offset,
            end: end.offset,
            loc: SourceLocation {
                start: start.pos,
                end: end.pos,
            },
        }
    }

    pub fn start_marker(&self) -> Marker {
        Marker {
            offset: self.start,
            pos: self.loc.start,
        }
    }

    pub fn end_marker(&self) -> Marker {
        Marker {
            offset: self.end,
            pos: self.loc.end,
        }
    }

    /// Get the length of the span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        let start = if other.start < self.start {
            other.start_marker()
        } else {
            self.start_marker()
        };
        let end = if other.end > self.end {
            other.end_marker()
        } else {
            self.end_marker()
        };
        Span::between(start, end)
    }

    /// Check if this span contains a position.
    #[inline]
    pub fn contains(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end
    }
}

/// Maps byte offsets to line/column positions.
///
/// Recognizes every ECMAScript line terminator: LF, CR, CRLF, U+2028 and
/// U+2029. Lines made only of ASCII skip the UTF-16 recount.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    /// Byte offset of the start of each line.
    line_starts: Vec<u32>,
    ascii_lines: Vec<bool>,
}

impl<'a> LineIndex<'a> {
    /// Build a line index from source code.
    pub fn new(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i as u32 + 1),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i as u32 + 1);
                }
                // U+2028 / U+2029 encode as E2 80 A8 / E2 80 A9.
                0xE2 if bytes.get(i + 1) == Some(&0x80)
                    && matches!(bytes.get(i + 2), Some(0xA8 | 0xA9)) =>
                {
                    i += 2;
                    line_starts.push(i as u32 + 1);
                }
                _ => {}
            }
            i += 1;
        }

        let ascii_lines = line_starts
            .iter()
            .enumerate()
            .map(|(idx, &start)| {
                let end = line_starts
                    .get(idx + 1)
                    .map_or(bytes.len(), |&next| next as usize);
                bytes[start as usize..end].is_ascii()
            })
            .collect();

        Self {
            source,
            line_starts,
            ascii_lines,
        }
    }

    /// Get the line/column position for a byte offset.
    pub fn position(&self, offset: u32) -> Position {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        let column = if self.ascii_lines[line] {
            offset - line_start
        } else {
            match self.source.get(line_start as usize..offset as usize) {
                Some(text) => text.encode_utf16().count() as u32,
                None => offset - line_start,
            }
        };
        Position {
            line: line as u32 + 1,
            column,
        }
    }

    /// Build a marker for a byte offset.
    pub fn marker(&self, offset: u32) -> Marker {
        Marker {
            offset,
            pos: self.position(offset),
        }
    }

    /// Get the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let index = LineIndex::new("abcdefghijklmnopqrstuvwxyz");
        let a = Span::between(index.marker(5), index.marker(10));
        let b = Span::between(index.marker(8), index.marker(15));
        let merged = a.merge(b);
        assert_eq!(merged.start, 5);
        assert_eq!(merged.end, 15);
        assert_eq!(merged.loc.end.column, 15);
    }

    #[test]
    fn test_line_index() {
        let source = "line1\nline2\nline3";
        let index = LineIndex::new(source);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position(0), Position { line: 1, column: 0 });
        assert_eq!(index.position(3), Position { line: 1, column: 3 });
        assert_eq!(index.position(6), Position { line: 2, column: 0 });
        assert_eq!(index.position(14), Position { line: 3, column: 2 });
    }

    #[test]
    fn test_all_line_terminators() {
        let source = "a\r\nb\rc\u{2028}d\u{2029}e";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 5);
        let e = source.find('e').unwrap() as u32;
        assert_eq!(index.position(e), Position { line: 5, column: 0 });
    }

    #[test]
    fn test_columns_are_utf16() {
        // U+1F600 is four bytes in UTF-8 and two UTF-16 code units.
        let source = "'\u{1F600}' + x";
        let index = LineIndex::new(source);
        let x = source.find('x').unwrap() as u32;
        assert_eq!(index.position(x), Position { line: 1, column: 7 });
    }
}
