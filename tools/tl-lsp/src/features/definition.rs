use tl_ir::TextRange;
use tl_parse::{Document, Segment};
use tl_types::{lookup, TypeId, TypeReport, TypeWalker};
use tower_lsp::lsp_types::{Location, Position, Range};

use super::{chain_at_word, log_miss, Cursor};
use crate::convert;
use crate::session::Analysis;

/// Where the identifier under the cursor was declared.
///
/// A plain name goes to its declaration in the symbol table; a member goes
/// to the declaration of its type.
pub fn definition(doc: &Document, analysis: &Analysis, position: Position) -> Option<Location> {
    let cursor = Cursor::new(doc, position);
    let chain = chain_at_word(doc, cursor)?;
    let report = &*analysis.report;
    let (line, column) = cursor.compiler_position();

    if let [Segment::Name(name)] = chain.segments.as_slice() {
        let binding = lookup(report, name, line, column)?;
        return match binding.declared_at {
            Some((line, column)) => Some(Location::new(
                analysis.paths.document().clone(),
                declaration_range(doc, line, column),
            )),
            None => type_location(doc, analysis, binding.type_id, false),
        };
    }

    let id = resolve(report, &chain.segments, line, column, "definition")?;
    type_location(doc, analysis, id, false)
}

/// Where the type of the expression under the cursor was declared.
pub fn type_definition(
    doc: &Document,
    analysis: &Analysis,
    position: Position,
) -> Option<Location> {
    let cursor = Cursor::new(doc, position);
    let chain = chain_at_word(doc, cursor)?;
    let (line, column) = cursor.compiler_position();
    let id = resolve(&analysis.report, &chain.segments, line, column, "type definition")?;
    type_location(doc, analysis, id, true)
}

fn resolve(
    report: &TypeReport,
    segments: &[Segment],
    line: u32,
    column: u32,
    feature: &'static str,
) -> Option<TypeId> {
    TypeWalker::new(report)
        .resolve_id(segments, line, column)
        .map_err(|miss| log_miss(feature, &miss))
        .ok()
}

/// Declaration site of type `id`. Nominal types are followed to their
/// target when the nominal itself has no location, or always with
/// `structural`.
fn type_location(
    doc: &Document,
    analysis: &Analysis,
    id: TypeId,
    structural: bool,
) -> Option<Location> {
    let walker = TypeWalker::new(&analysis.report);
    let own = walker.info(id).ok()?.location.as_ref().filter(|_| !structural);
    let location = match own {
        Some(location) => location,
        None => walker.deref(id).ok()?.location.as_ref()?,
    };

    if analysis.report.is_main_file(location.file.as_deref()) {
        return Some(Location::new(
            analysis.paths.document().clone(),
            declaration_range(doc, location.line, location.column),
        ));
    }
    let file = location.file.as_deref()?;
    let uri = analysis.paths.to_uri(file)?;
    let point = convert::from_compiler(location.line, location.column);
    Some(Location::new(
        uri,
        Range::new(
            Position::new(point.row, point.column),
            Position::new(point.row, point.column),
        ),
    ))
}

/// Range of the word at a 1-based position of `doc`.
fn declaration_range(doc: &Document, line: u32, column: u32) -> Range {
    let point = convert::from_compiler(line, column);
    let word = doc
        .word_range_at(point)
        .unwrap_or(TextRange::new(point, point));
    convert::range(doc, word)
}
