use tl_parse::{call_root_at, chain_segments, Document, Field, Node, Segment, SyntaxKind};
use tl_types::{signature, TypeWalker};
use tower_lsp::lsp_types::{
    ParameterInformation, ParameterLabel, Position, SignatureHelp, SignatureInformation,
};

use super::{log_miss, Cursor};
use crate::session::Analysis;

/// Signatures of the call whose argument list holds the cursor.
///
/// Every overload of a poly function is offered. The active signature is
/// the first one with enough parameters for the argument being typed.
pub fn signature_help(
    doc: &Document,
    analysis: &Analysis,
    position: Position,
) -> Option<SignatureHelp> {
    let cursor = Cursor::new(doc, position);
    let call = call_root_at(doc.tree(), cursor.offset)?;
    let called = call.called_object;
    let segments = chain_segments(called, called.end());
    let name = segments
        .iter()
        .rev()
        .find_map(Segment::name)
        .unwrap_or("function");
    let (line, column) = cursor.compiler_position();

    let report = &*analysis.report;
    let walker = TypeWalker::new(report);
    let overloads = walker
        .resolve_id(&segments, line, column)
        .and_then(|id| walker.call_result(id, pending_calls(called)))
        .and_then(|id| walker.overloads(id))
        .map_err(|miss| log_miss("signature help", &miss))
        .ok()?;
    if overloads.is_empty() {
        return None;
    }

    let active = call.active_parameter;
    let signatures: Vec<_> = overloads
        .into_iter()
        .map(|func| signature(report, func, name, call.is_method()))
        .collect();
    let active_signature = signatures
        .iter()
        .position(|sig| sig.parameters.len() > active as usize)
        .unwrap_or(0);

    Some(SignatureHelp {
        signatures: signatures
            .into_iter()
            .map(|sig| SignatureInformation {
                label: sig.label,
                documentation: None,
                parameters: Some(
                    sig.parameters
                        .into_iter()
                        .map(|param| ParameterInformation {
                            label: ParameterLabel::Simple(param),
                            documentation: None,
                        })
                        .collect(),
                ),
                active_parameter: None,
            })
            .collect(),
        active_signature: u32::try_from(active_signature).ok(),
        active_parameter: Some(active),
    })
}

/// Calls applied to the chain before the one being typed, as in the outer
/// call of `make()(`.
fn pending_calls(called: Node<'_>) -> usize {
    let mut calls = 0;
    let mut node = called;
    while node.kind() == SyntaxKind::FunctionCall {
        calls += 1;
        match node.child_by_field(Field::CalledObject) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    calls
}
