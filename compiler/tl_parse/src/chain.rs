//! Member-access chains around a cursor.
//!
//! Finds the expression a cursor is completing or hovering inside
//! (`a.b:c`, `t[1].x`, `mod.Type`) and splits it into the segments a type
//! walker resolves one after another.

use std::fmt;

use tl_lexer::TokenKind;

use crate::kind::{Field, SyntaxKind};
use crate::stack::ensure_sufficient_stack;
use crate::tree::{Node, Tree};

/// One step of a member-access chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A variable, field, method or type name.
    Name(String),
    /// Positional indexing, `t[k]`; the key is not part of the chain.
    Bracket,
    /// A string literal used as the chain base, as in `("x"):upper()`.
    Str(String),
}

impl Segment {
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Name(name) => Some(name),
            Segment::Bracket | Segment::Str(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Name(name) => f.write_str(name),
            Segment::Bracket => f.write_str("[]"),
            Segment::Str(text) => f.write_str(text),
        }
    }
}

/// Kinds that can sit at the base of a chain, used when the accessor the
/// cursor follows did not produce a chain node (`a..`, `f(x):` after an
/// error).
fn is_chain_base(kind: SyntaxKind) -> bool {
    kind.is_chain()
        || matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::FunctionCall
                | SyntaxKind::ParenthesizedExpression
        )
}

/// The chain the cursor at byte `offset` is part of.
///
/// Prefers the smallest `index`, `method_index`, `bracket_index` or
/// `type_index` that starts before the cursor and ends at or after it,
/// ignoring chains whose argument lists the cursor is inside. Otherwise, if
/// the byte before the cursor is `.` or `:`, the outermost expression ending
/// right before that accessor.
pub fn chain_root_at(tree: &Tree, offset: u32) -> Option<Node<'_>> {
    let enclosing = tree
        .root()
        .descendants()
        .filter(|node| {
            node.kind().is_chain()
                && node.start() < offset
                && offset <= node.end()
                && !cursor_in_arguments(*node, offset)
        })
        .fold(None, smaller);
    if enclosing.is_some() {
        return enclosing;
    }

    let accessor = offset.checked_sub(1)?;
    let byte = tree.text().as_bytes().get(accessor as usize)?;
    if !matches!(byte, b'.' | b':') {
        return None;
    }
    tree.root()
        .descendants()
        .filter(|node| is_chain_base(node.kind()) && node.end() == accessor)
        .fold(None, |best: Option<Node<'_>>, node| match best {
            Some(best) if best.span().len() >= node.span().len() => Some(best),
            _ => Some(node),
        })
}

fn smaller<'t>(best: Option<Node<'t>>, node: Node<'t>) -> Option<Node<'t>> {
    match best {
        Some(best) if best.span().len() <= node.span().len() => Some(best),
        _ => Some(node),
    }
}

/// Whether the cursor lies between the parentheses of a call inside `node`.
fn cursor_in_arguments(node: Node<'_>, offset: u32) -> bool {
    node.descendants()
        .filter(|n| n.kind() == SyntaxKind::Arguments)
        .any(|args| arguments_contain(args, offset))
}

fn arguments_contain(args: Node<'_>, offset: u32) -> bool {
    if offset <= args.start() {
        return false;
    }
    let closed = args
        .children()
        .next_back()
        .is_some_and(|last| last.token() == Some(TokenKind::RParen));
    if closed {
        return offset < args.end();
    }
    // An unclosed list extends over the whitespace after its last token.
    offset <= args.end()
        || args
            .tree()
            .text()
            .get(args.end() as usize..offset as usize)
            .is_some_and(|gap| gap.trim().is_empty())
}

/// Segments of `root` that start before `offset`, in source order.
///
/// Argument lists and bracket keys are not descended into, so
/// `f(x.y).z` yields `f`, `z` and `t[i].k` yields `t`, `[]`, `k`.
pub fn chain_segments(root: Node<'_>, offset: u32) -> Vec<Segment> {
    let mut segments = Vec::new();
    collect_segments(root, offset, &mut segments);
    segments
}

fn collect_segments(node: Node<'_>, offset: u32, out: &mut Vec<Segment>) {
    ensure_sufficient_stack(|| collect_node_segments(node, offset, out));
}

fn collect_node_segments(node: Node<'_>, offset: u32, out: &mut Vec<Segment>) {
    if node.start() >= offset {
        return;
    }
    match node.kind() {
        SyntaxKind::Identifier => out.push(Segment::Name(node.text().to_owned())),
        SyntaxKind::String if out.is_empty() => out.push(Segment::Str(node.text().to_owned())),
        SyntaxKind::BracketIndex => {
            if let Some(object) = node.child_by_field(Field::Object) {
                collect_segments(object, offset, out);
            }
            let opened = node
                .children()
                .find(|child| child.token() == Some(TokenKind::LBracket))
                .is_some_and(|bracket| bracket.start() < offset);
            if opened {
                out.push(Segment::Bracket);
            }
        }
        SyntaxKind::FunctionCall => {
            if let Some(called) = node.child_by_field(Field::CalledObject) {
                collect_segments(called, offset, out);
            }
        }
        SyntaxKind::Index
        | SyntaxKind::MethodIndex
        | SyntaxKind::TypeIndex
        | SyntaxKind::SimpleType
        | SyntaxKind::ParenthesizedExpression => {
            for child in node.named_children() {
                if child.field() != Some(Field::Typeargs) {
                    collect_segments(child, offset, out);
                }
            }
        }
        _ => {}
    }
}

/// A call whose argument list contains the cursor.
#[derive(Copy, Clone, Debug)]
pub struct ActiveCall<'t> {
    pub call: Node<'t>,
    /// The expression being called (`f`, `a.b`, `obj:m`).
    pub called_object: Node<'t>,
    /// Zero-based index of the argument under the cursor.
    pub active_parameter: u32,
}

impl ActiveCall<'_> {
    /// Whether the call uses `:` and passes its receiver implicitly.
    pub fn is_method(&self) -> bool {
        self.called_object.kind() == SyntaxKind::MethodIndex
    }
}

/// The innermost call whose arguments contain the cursor at `offset`.
pub fn call_root_at(tree: &Tree, offset: u32) -> Option<ActiveCall<'_>> {
    let args = tree
        .root()
        .descendants()
        .filter(|node| node.kind() == SyntaxKind::Arguments && arguments_contain(*node, offset))
        .fold(None, smaller)?;
    let call = args.parent()?;
    let called_object = call.child_by_field(Field::CalledObject)?;
    let commas = args
        .children()
        .filter(|child| child.token() == Some(TokenKind::Comma) && child.start() < offset)
        .count();
    Some(ActiveCall {
        call,
        called_object,
        active_parameter: u32::try_from(commas).unwrap_or(u32::MAX),
    })
}
