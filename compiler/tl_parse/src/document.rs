//! An open text document and its syntax tree.

use tl_ir::incremental::InputEdit;
use tl_ir::{LineIndex, Point, TextRange};

use crate::incremental::IncrementalStats;
use crate::tree::{Node, Tree};

/// One edit as sent by the editor: replace `range` with `text`, or the
/// whole document when `range` is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentChange {
    pub range: Option<TextRange>,
    pub text: String,
}

impl ContentChange {
    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        ContentChange {
            range: Some(range),
            text: text.into(),
        }
    }

    pub fn full(text: impl Into<String>) -> Self {
        ContentChange {
            range: None,
            text: text.into(),
        }
    }
}

/// Versioned text buffer kept in sync with its syntax tree.
///
/// Positions are zero-based rows and byte columns. Out-of-range positions
/// are clamped to the text.
#[derive(Clone, Debug)]
pub struct Document {
    uri: String,
    version: u32,
    text: String,
    line_index: LineIndex,
    tree: Tree,
    last_parse: IncrementalStats,
}

impl Document {
    /// Parse `text` as version 1 of the document at `uri`.
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Document {
            uri: uri.into(),
            version: 1,
            line_index: LineIndex::new(&text),
            tree: crate::parse(&text),
            text,
            last_parse: IncrementalStats::default(),
        }
    }

    /// Apply a batch of edits in order and bump the version once.
    pub fn apply_edits(&mut self, changes: &[ContentChange]) {
        self.apply_edits_with(changes, |_, change| change.clone());
    }

    /// Like [`Document::apply_edits`], converting each edit against the
    /// document as left by the edits before it. Editors address later edits
    /// of a batch in the text produced by earlier ones, in their own column
    /// encoding.
    #[tracing::instrument(level = "debug", skip_all, fields(uri = %self.uri))]
    pub fn apply_edits_with<T>(
        &mut self,
        changes: impl IntoIterator<Item = T>,
        mut convert: impl FnMut(&Self, T) -> ContentChange,
    ) {
        for change in changes {
            let change = convert(self, change);
            match change.range {
                Some(range) => self.apply_range_edit(range, &change.text),
                None => self.replace_all(&change.text),
            }
        }
        self.version += 1;
    }

    fn apply_range_edit(&mut self, range: TextRange, new_text: &str) {
        let start = self.offset(range.start);
        let old_end = self.offset(range.end).max(start);
        let edit = InputEdit::new(
            start,
            old_end,
            self.line_index.point(start),
            self.line_index.point(old_end),
            new_text,
        );
        self.tree.edit(&edit);
        self.text
            .replace_range(start as usize..old_end as usize, new_text);
        self.line_index = LineIndex::new(&self.text);
        let (tree, stats) = crate::reparse(&self.text, &self.tree);
        self.tree = tree;
        self.last_parse = stats;
    }

    fn replace_all(&mut self, text: &str) {
        self.text = text.to_owned();
        self.line_index = LineIndex::new(&self.text);
        self.tree = crate::parse(&self.text);
        self.last_parse = IncrementalStats::default();
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Statement reuse of the most recent reparse.
    pub fn last_parse(&self) -> &IncrementalStats {
        &self.last_parse
    }

    /// The text inside `range`, or the whole text.
    pub fn text(&self, range: Option<TextRange>) -> &str {
        let Some(range) = range else {
            return &self.text;
        };
        let start = self.offset(range.start);
        let end = self.offset(range.end).max(start);
        &self.text[start as usize..end as usize]
    }

    /// Byte offset of `point`, clamped to its line and to a char boundary.
    pub fn offset(&self, point: Point) -> u32 {
        let mut offset = self.line_index.offset(point);
        while offset > 0 && !self.text.is_char_boundary(offset as usize) {
            offset -= 1;
        }
        offset
    }

    pub fn point(&self, offset: u32) -> Point {
        self.line_index.point(offset)
    }

    /// Smallest named node containing `point`, counting a node's end as
    /// inside it so a cursor right after a token still finds the token.
    pub fn node_at(&self, point: Point) -> Option<Node<'_>> {
        let offset = self.offset(point);
        self.tree
            .root()
            .descendants()
            .filter(|node| node.is_named() && node.start() <= offset && offset <= node.end())
            .fold(None, |best: Option<Node<'_>>, node| match best {
                Some(best) if best.span().len() <= node.span().len() => Some(best),
                _ => Some(node),
            })
    }

    /// The identifier-character run around `point`, or `None` when the
    /// character at `point` is not an identifier character.
    pub fn word_range_at(&self, point: Point) -> Option<TextRange> {
        let line = self.line_index.line_span(point.row);
        let bytes = &self.text.as_bytes()[line.to_range()];
        let column = point.column as usize;
        if !bytes.get(column).copied().is_some_and(is_word_byte) {
            return None;
        }
        let start = bytes[..column]
            .iter()
            .rposition(|&b| !is_word_byte(b))
            .map_or(0, |i| i + 1);
        let end = bytes[column..]
            .iter()
            .position(|&b| !is_word_byte(b))
            .map_or(bytes.len(), |i| column + i);
        Some(TextRange::new(
            Point::new(point.row, to_u32(start)),
            Point::new(point.row, to_u32(end)),
        ))
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
