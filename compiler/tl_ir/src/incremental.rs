//! Edits expressed in byte offsets, and the region of an old syntax tree
//! they invalidate.
//!
//! An editor edit arrives as an [`InputEdit`] (bytes and points). The tree
//! folds one or more of them into a [`ChangeMarker`] which the parser then
//! consults to decide which old statements it may reuse.

use crate::{Point, Span};

/// `[start, old_end)` of the old text replaced by `new_len` bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TextChange {
    pub start: u32,
    pub old_end: u32,
    pub new_len: u32,
}

impl TextChange {
    #[inline]
    pub const fn new(start: u32, old_end: u32, new_len: u32) -> Self {
        TextChange {
            start,
            old_end,
            new_len,
        }
    }

    /// Growth of the document in bytes; negative when it shrank.
    ///
    /// ```
    /// use tl_ir::incremental::TextChange;
    ///
    /// assert_eq!(TextChange::new(4, 4, 3).delta(), 3);
    /// assert_eq!(TextChange::new(4, 9, 0).delta(), -5);
    /// ```
    #[inline]
    pub fn delta(&self) -> i64 {
        i64::from(self.new_len) - i64::from(self.old_end) + i64::from(self.start)
    }
}

/// A [`TextChange`] with the points of its start, old end and new end.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct InputEdit {
    pub change: TextChange,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

impl InputEdit {
    /// Replacing the bytes between `start` and `old_end`, whose points are
    /// already known, with `new_text`.
    pub fn new(
        start: u32,
        old_end: u32,
        start_point: Point,
        old_end_point: Point,
        new_text: &str,
    ) -> Self {
        InputEdit {
            change: TextChange::new(start, old_end, byte_len(new_text)),
            start_point,
            old_end_point,
            new_end_point: end_point(start_point, new_text),
        }
    }
}

/// Where the cursor lands after typing `text` at `start`. A multi-line
/// insertion ends at the byte length of its last line.
fn end_point(start: Point, text: &str) -> Point {
    match text.rfind('\n') {
        None => Point::new(start.row, start.column.saturating_add(byte_len(text))),
        Some(last) => {
            let newlines = text.bytes().filter(|&b| b == b'\n').count();
            Point::new(
                start.row.saturating_add(u32::try_from(newlines).unwrap_or(u32::MAX)),
                byte_len(&text[last + 1..]),
            )
        }
    }
}

fn byte_len(text: &str) -> u32 {
    u32::try_from(text.len()).unwrap_or(u32::MAX)
}

/// The part of an old text, `[affected_start, affected_end)`, whose syntax
/// is stale, and the shift `delta` applied to everything after it.
///
/// The region starts at the end of the token before the change, since the
/// parser ends a statement by looking at the token that follows it.
///
/// ```
/// use tl_ir::incremental::{ChangeMarker, TextChange};
///
/// let marker = ChangeMarker::from_change(&TextChange::new(100, 110, 15), 95);
/// assert_eq!(marker.affected_start, 95);
/// assert_eq!(marker.adjust_position(50), 50);
/// assert_eq!(marker.adjust_position(200), 205);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChangeMarker {
    pub affected_start: u32,
    pub affected_end: u32,
    pub delta: i64,
}

impl ChangeMarker {
    #[inline]
    pub const fn new(affected_start: u32, affected_end: u32, delta: i64) -> Self {
        ChangeMarker {
            affected_start,
            affected_end,
            delta,
        }
    }

    /// Marker for a single change, given where the preceding token ends.
    pub fn from_change(change: &TextChange, prev_token_end: u32) -> Self {
        let start = if prev_token_end < change.start {
            prev_token_end
        } else {
            change.start
        };
        ChangeMarker::new(start, change.old_end, change.delta())
    }

    /// Whether an old node spanning `span` is untouched by the change.
    ///
    /// A node ending exactly at the region start is not: text inserted there
    /// may extend it.
    #[inline]
    pub fn is_reusable(&self, span: Span) -> bool {
        span.end < self.affected_start || self.affected_end <= span.start
    }

    /// Old offset mapped into the new text. Offsets inside the region are
    /// left alone.
    pub fn adjust_position(&self, pos: u32) -> u32 {
        if pos < self.affected_end {
            return pos;
        }
        u32::try_from(i64::from(pos) + self.delta).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests;
