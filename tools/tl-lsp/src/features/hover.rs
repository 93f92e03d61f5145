use tl_parse::Document;
use tl_types::{type_name, TypeWalker};
use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use super::{chain_at_word, log_miss, Cursor};
use crate::convert;
use crate::session::Analysis;

/// Type of the identifier under the cursor.
///
/// The member chain is resolved first; the compiler's position map is the
/// fallback for expressions the chain walk cannot follow.
pub fn hover(doc: &Document, analysis: &Analysis, position: Position) -> Option<Hover> {
    let cursor = Cursor::new(doc, position);
    let chain = chain_at_word(doc, cursor)?;
    let report = &*analysis.report;
    let (line, column) = cursor.compiler_position();

    let id = match TypeWalker::new(report).resolve_id(&chain.segments, line, column) {
        Ok(id) => id,
        Err(miss) => {
            log_miss("hover", &miss);
            let (line, column) = convert::to_compiler(chain.word.start);
            report.type_at(line, column)?
        }
    };

    let value = format!("```teal\n{}: {}\n```", chain.name, type_name(report, id));
    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: Some(convert::range(doc, chain.word)),
    })
}
