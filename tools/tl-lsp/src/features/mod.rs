//! Editor features answered from the document tree and the cached report.
//!
//! Every feature is a plain function of a [`Document`], its latest
//! [`Analysis`] and a protocol position. Anything that does not resolve
//! yields an empty result.

pub mod completion;
pub mod definition;
pub mod hover;
pub mod signature;

use tl_ir::{Point, TextRange};
use tl_parse::{chain_root_at, chain_segments, Document, Segment};
use tl_types::ResolveMiss;
use tower_lsp::lsp_types::Position;

use crate::convert;

/// A request position resolved against one document.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub point: Point,
    pub offset: u32,
}

impl Cursor {
    pub fn new(doc: &Document, position: Position) -> Self {
        let point = convert::point(doc, position);
        Cursor {
            point,
            offset: doc.offset(point),
        }
    }

    /// 1-based position for report lookups.
    pub fn compiler_position(&self) -> (u32, u32) {
        convert::to_compiler(self.point)
    }
}

/// The identifier under the cursor and the chain it ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordChain {
    pub word: TextRange,
    pub name: String,
    /// Segments up to and including `name`.
    pub segments: Vec<Segment>,
}

/// The word under `cursor`, or the one ending right before it.
pub fn word_at(doc: &Document, cursor: Cursor) -> Option<TextRange> {
    doc.word_range_at(cursor.point).or_else(|| {
        let column = cursor.point.column.checked_sub(1)?;
        doc.word_range_at(Point::new(cursor.point.row, column))
    })
}

pub fn chain_at_word(doc: &Document, cursor: Cursor) -> Option<WordChain> {
    let word = word_at(doc, cursor)?;
    let end = doc.offset(word.end);
    let name = doc.text(Some(word)).to_owned();
    let segments = chain_root_at(doc.tree(), end)
        .map(|root| chain_segments(root, end))
        .filter(|segments| segments.last().and_then(Segment::name) == Some(name.as_str()))
        .unwrap_or_else(|| vec![Segment::Name(name.clone())]);
    Some(WordChain {
        word,
        name,
        segments,
    })
}

pub(crate) fn log_miss(feature: &'static str, miss: &ResolveMiss) {
    tracing::debug!(feature, %miss, "nothing resolved");
}
