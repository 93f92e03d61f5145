//! Arena-allocated concrete syntax tree.
//!
//! Every token of the source becomes a leaf, so concatenating the leaf
//! texts (with the trivia between them) reproduces the source. Nodes are
//! addressed by [`NodeId`]; [`Node`] is a cheap borrowed handle with
//! tree-sitter style navigation.

use std::fmt;
use std::sync::Arc;

use tl_ir::incremental::{ChangeMarker, InputEdit};
use tl_ir::Span;
use tl_lexer::TokenKind;

use crate::kind::{Field, SyntaxKind};
use crate::stack::ensure_sufficient_stack;

/// Index of a node in its tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) span: Span,
    pub(crate) field: Option<Field>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Token kind for leaves, `None` for interior nodes.
    pub(crate) token: Option<TokenKind>,
    pub(crate) has_error: bool,
}

/// A syntax error recorded while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

/// A parsed document.
///
/// Immutable once built, except for [`Tree::edit`], which only records how
/// the text changed so the next parse can reuse unaffected statements.
#[derive(Clone, Debug)]
pub struct Tree {
    pub(crate) text: Arc<str>,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: NodeId,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) marker: Option<ChangeMarker>,
}

impl Tree {
    /// Source text this tree was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    /// Syntax errors in source order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Change recorded by [`Tree::edit`] since this tree was parsed.
    pub fn pending_change(&self) -> Option<&ChangeMarker> {
        self.marker.as_ref()
    }

    /// Record an edit of the source.
    ///
    /// Edits are described in the coordinates of the text as it is after all
    /// previously recorded edits; several edits before a reparse are merged
    /// into one affected region of the original text.
    pub fn edit(&mut self, edit: &InputEdit) {
        let change = edit.change;
        let marker = match self.marker.take() {
            None => ChangeMarker::from_change(&change, self.token_end_before(change.start)),
            Some(prev) => {
                let new_end = shift(prev.affected_end, prev.delta);
                let start = if change.start < prev.affected_start {
                    change.start
                } else if change.start >= new_end {
                    shift(change.start, -prev.delta)
                } else {
                    prev.affected_start
                };
                let old_end = if change.old_end >= new_end {
                    shift(change.old_end, -prev.delta)
                } else {
                    prev.affected_end
                };
                let affected_start = self.token_end_before(start).min(prev.affected_start);
                ChangeMarker::new(
                    affected_start,
                    old_end.max(prev.affected_end),
                    prev.delta + change.delta(),
                )
            }
        };
        tracing::trace!(?marker, "tree edited");
        self.marker = Some(marker);
    }

    /// End of the last token that ends strictly before `offset`, or 0.
    fn token_end_before(&self, offset: u32) -> u32 {
        self.leaves()
            .map(|leaf| leaf.span().end)
            .take_while(|&end| end < offset)
            .last()
            .unwrap_or(0)
    }

    /// All leaves in source order.
    pub fn leaves(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.root().descendants().filter(|node| node.is_leaf())
    }

    /// Tree-sitter style s-expression of the named nodes, with field names.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(self.root(), &mut out);
        out
    }
}

fn shift(pos: u32, delta: i64) -> u32 {
    u32::try_from((i64::from(pos) + delta).max(0)).unwrap_or(u32::MAX)
}

fn write_sexp(node: Node<'_>, out: &mut String) {
    ensure_sufficient_stack(|| {
        if let Some(field) = node.field() {
            out.push_str(field.as_str());
            out.push_str(": ");
        }
        out.push('(');
        out.push_str(node.kind().as_str());
        for child in node.named_children() {
            out.push(' ');
            write_sexp(child, out);
        }
        out.push(')');
    });
}

/// Borrowed handle to one node.
#[derive(Copy, Clone)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> Node<'t> {
    #[inline]
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.data().span
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.data().span.start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.data().span.end
    }

    #[inline]
    pub fn is_named(&self) -> bool {
        self.data().kind.is_named()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.data().kind == SyntaxKind::Error
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.data().token.is_some()
    }

    /// Token kind of a leaf.
    #[inline]
    pub fn token(&self) -> Option<TokenKind> {
        self.data().token
    }

    /// Whether this node or any descendant is or contains a syntax error.
    #[inline]
    pub fn has_error(&self) -> bool {
        self.data().has_error
    }

    /// Role of this node within its parent.
    #[inline]
    pub fn field(&self) -> Option<Field> {
        self.data().field
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// Source text covered by this node.
    pub fn text(&self) -> &'t str {
        self.tree
            .text
            .get(self.span().to_range())
            .unwrap_or_default()
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.data()
            .children
            .get(index)
            .map(|&id| self.tree.node(id))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| tree.node(id))
    }

    pub fn named_children(&self) -> impl DoubleEndedIterator<Item = Node<'t>> + 't {
        self.children().filter(Node::is_named)
    }

    /// First child carrying `field`.
    pub fn child_by_field(&self, field: Field) -> Option<Node<'t>> {
        self.children().find(|child| child.field() == Some(field))
    }

    /// First child of the given kind.
    pub fn child_of_kind(&self, kind: SyntaxKind) -> Option<Node<'t>> {
        self.children().find(|child| child.kind() == kind)
    }

    /// This node and all its descendants, in pre-order.
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'t>> + 't {
        std::iter::successors(self.parent(), Node::parent)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind().as_str(), self.span())
    }
}

/// Pre-order traversal; see [`Node::descendants`].
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let id = self.stack.pop()?;
        let data = &self.tree.nodes[id.index()];
        self.stack.extend(data.children.iter().rev().copied());
        Some(self.tree.node(id))
    }
}
