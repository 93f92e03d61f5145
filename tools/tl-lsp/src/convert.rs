//! Conversions between protocol types and the engine's own.
//!
//! Three coordinate systems meet here: protocol positions count UTF-16
//! units, documents count bytes from zero, and the compiler counts bytes
//! from one.

use tl_diagnostic::Severity;
use tl_ir::{Point, TextRange};
use tl_parse::{ContentChange, Document};
use tower_lsp::lsp_types::{
    self, DiagnosticSeverity, Position, Range, TextDocumentContentChangeEvent,
};

pub fn point(doc: &Document, position: Position) -> Point {
    doc.line_index()
        .point_from_utf16(doc.text(None), position.line, position.character)
}

pub fn position(doc: &Document, point: Point) -> Position {
    Position::new(
        point.row,
        doc.line_index().utf16_column(doc.text(None), point),
    )
}

pub fn range(doc: &Document, range: TextRange) -> Range {
    Range::new(position(doc, range.start), position(doc, range.end))
}

pub fn text_range(doc: &Document, range: Range) -> TextRange {
    TextRange::new(point(doc, range.start), point(doc, range.end))
}

/// An editor edit, addressed in `doc` as it stands before the edit.
pub fn content_change(doc: &Document, change: TextDocumentContentChangeEvent) -> ContentChange {
    match change.range {
        Some(range) => ContentChange::replace(text_range(doc, range), change.text),
        None => ContentChange::full(change.text),
    }
}

/// 1-based line and column as the compiler reports them.
#[inline]
pub fn to_compiler(point: Point) -> (u32, u32) {
    (point.row + 1, point.column + 1)
}

#[inline]
pub fn from_compiler(line: u32, column: u32) -> Point {
    Point::new(line.saturating_sub(1), column.saturating_sub(1))
}

/// Protocol diagnostic. Columns are converted through `doc` when the
/// diagnostic belongs to it and passed through unchanged otherwise.
pub fn diagnostic(
    doc: Option<&Document>,
    diagnostic: &tl_diagnostic::Diagnostic,
) -> lsp_types::Diagnostic {
    let range = match doc {
        Some(doc) => range(doc, diagnostic.range),
        None => Range::new(
            Position::new(diagnostic.range.start.row, diagnostic.range.start.column),
            Position::new(diagnostic.range.end.row, diagnostic.range.end.column),
        ),
    };
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };
    lsp_types::Diagnostic {
        range,
        severity: Some(severity),
        source: Some(diagnostic.source.to_owned()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}
