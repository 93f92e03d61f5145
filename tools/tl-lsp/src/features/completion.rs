use tl_parse::{chain_root_at, chain_segments, Document};
use tl_types::{type_name, visible_symbols, TypeId, TypeKind, TypeWalker};
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Position};

use super::{log_miss, Cursor};
use crate::session::Analysis;

/// Lua keywords and Teal's contextual ones.
pub const KEYWORDS: &[&str] = &[
    "and", "as", "break", "do", "else", "elseif", "end", "enum", "false", "for", "function",
    "global", "goto", "if", "in", "interface", "is", "local", "nil", "not", "or", "record",
    "repeat", "return", "then", "true", "type", "until", "where", "while",
];

/// Completion candidates at the cursor.
///
/// After `.` or `:` (with or without a partial name typed) these are the
/// members of the value before the accessor, limited to callable ones for
/// `:`. Elsewhere they are the names in scope followed by the keywords.
pub fn completion(
    doc: &Document,
    analysis: Option<&Analysis>,
    position: Position,
) -> Vec<CompletionItem> {
    let cursor = Cursor::new(doc, position);
    if let Some((start, accessor)) = member_access(doc, cursor) {
        return analysis
            .and_then(|analysis| members(doc, analysis, cursor, start, accessor))
            .unwrap_or_default();
    }

    let mut items = analysis
        .map(|analysis| scope_items(analysis, cursor))
        .unwrap_or_default();
    items.extend(KEYWORDS.iter().map(|keyword| CompletionItem {
        label: (*keyword).to_owned(),
        kind: Some(CompletionItemKind::KEYWORD),
        ..Default::default()
    }));
    items
}

/// Start of the partial name before the cursor and the accessor preceding
/// it, when there is one.
fn member_access(doc: &Document, cursor: Cursor) -> Option<(u32, u8)> {
    let text = doc.text(None).as_bytes();
    let prefix = text.get(..cursor.offset as usize)?;
    let start = prefix
        .iter()
        .rposition(|&b| !(b.is_ascii_alphanumeric() || b == b'_'))
        .map_or(0, |i| i + 1);
    let accessor = *prefix.get(start.checked_sub(1)?)?;
    let start = u32::try_from(start).ok()?;
    matches!(accessor, b'.' | b':').then_some((start, accessor))
}

fn members(
    doc: &Document,
    analysis: &Analysis,
    cursor: Cursor,
    start: u32,
    accessor: u8,
) -> Option<Vec<CompletionItem>> {
    let root = chain_root_at(doc.tree(), start)?;
    let segments = chain_segments(root, start);
    let (line, column) = cursor.compiler_position();

    let walker = TypeWalker::new(&analysis.report);
    let members = walker
        .resolve_id(&segments, line, column)
        .and_then(|id| walker.members(id))
        .map_err(|miss| log_miss("completion", &miss))
        .ok()?;

    let methods_only = accessor == b':';
    Some(
        members
            .iter()
            .filter(|&(_, &id)| !methods_only || is_callable(walker, id))
            .map(|(name, &id)| {
                let kind = if is_callable(walker, id) {
                    if methods_only {
                        CompletionItemKind::METHOD
                    } else {
                        CompletionItemKind::FUNCTION
                    }
                } else {
                    CompletionItemKind::FIELD
                };
                item(walker, name, id, kind)
            })
            .collect(),
    )
}

fn scope_items(analysis: &Analysis, cursor: Cursor) -> Vec<CompletionItem> {
    let (line, column) = cursor.compiler_position();
    let walker = TypeWalker::new(&analysis.report);
    let mut visible: Vec<_> = visible_symbols(&analysis.report, line, column)
        .into_iter()
        .collect();
    visible.sort_by(|(a, _), (b, _)| a.cmp(b));
    visible
        .into_iter()
        .map(|(name, binding)| {
            let kind = if is_callable(walker, binding.type_id) {
                CompletionItemKind::FUNCTION
            } else {
                CompletionItemKind::VARIABLE
            };
            item(walker, &name, binding.type_id, kind)
        })
        .collect()
}

fn is_callable(walker: TypeWalker<'_>, id: TypeId) -> bool {
    walker
        .deref(id)
        .is_ok_and(|ty| matches!(ty.kind, TypeKind::Function | TypeKind::Poly))
}

fn item(
    walker: TypeWalker<'_>,
    name: &str,
    id: TypeId,
    kind: CompletionItemKind,
) -> CompletionItem {
    CompletionItem {
        label: name.to_owned(),
        kind: Some(kind),
        detail: Some(type_name(walker.report(), id)),
        ..Default::default()
    }
}
