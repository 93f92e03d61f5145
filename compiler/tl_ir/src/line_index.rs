//! Line index: byte offsets <-> row/column points.

use crate::Span;

/// Zero-based row and byte column.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    #[inline]
    pub const fn new(row: u32, column: u32) -> Self {
        Point { row, column }
    }
}

/// A `[start, end)` range of points.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TextRange {
    pub start: Point,
    pub end: Point,
}

impl TextRange {
    #[inline]
    pub const fn new(start: Point, end: Point) -> Self {
        TextRange { start, end }
    }
}

/// Start offsets of every line in a text.
///
/// Rebuilt after each edit; the document owns one alongside its text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| to_u32(i + 1)),
        );
        LineIndex {
            line_starts,
            len: to_u32(text.len()),
        }
    }

    /// Number of lines (a trailing newline starts a new, empty line).
    pub fn line_count(&self) -> u32 {
        to_u32(self.line_starts.len())
    }

    /// Total text length in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte span of a line without its terminating newline.
    ///
    /// Rows past the end map to an empty span at the end of the text.
    pub fn line_span(&self, row: u32) -> Span {
        let Some(&start) = self.line_starts.get(row as usize) else {
            return Span::point(self.len);
        };
        let end = self
            .line_starts
            .get(row as usize + 1)
            .map_or(self.len, |next| next - 1);
        Span::new(start, end.max(start))
    }

    /// Convert a point to a byte offset, clamping the column to the line.
    pub fn offset(&self, point: Point) -> u32 {
        let line = self.line_span(point.row);
        line.start.saturating_add(point.column).min(line.end)
    }

    /// Convert a byte offset to a point.
    pub fn point(&self, offset: u32) -> Point {
        let offset = offset.min(self.len);
        let row = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Point::new(to_u32(row), offset - self.line_starts[row])
    }

    /// Convert a UTF-16 column on `row` (the editor protocol's default
    /// encoding) into a point with a byte column.
    pub fn point_from_utf16(&self, text: &str, row: u32, utf16_column: u32) -> Point {
        let line = &text[self.line_span(row).to_range()];
        let mut units = 0u32;
        for (byte, ch) in line.char_indices() {
            if units >= utf16_column {
                return Point::new(row, to_u32(byte));
            }
            units += to_u32(ch.len_utf16());
        }
        Point::new(row, to_u32(line.len()))
    }

    /// Convert a point with a byte column into a UTF-16 column.
    pub fn utf16_column(&self, text: &str, point: Point) -> u32 {
        let line = self.line_span(point.row);
        let end = self.offset(point);
        text.get(line.start as usize..end as usize)
            .map_or(point.column, |prefix| {
                to_u32(prefix.chars().map(char::len_utf16).sum())
            })
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
