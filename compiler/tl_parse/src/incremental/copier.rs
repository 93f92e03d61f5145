//! Deep copier for statements with span adjustment.

use tl_lexer::Token;

use crate::builder::TreeBuilder;
use crate::stack::ensure_sufficient_stack;
use crate::tree::Node;

/// Copies a subtree of an old tree into a builder, shifting every span by a
/// fixed delta (the statement moved as a whole).
pub struct TreeCopier {
    delta: i64,
}

impl TreeCopier {
    pub fn new(delta: i64) -> Self {
        TreeCopier { delta }
    }

    fn shift(&self, pos: u32) -> u32 {
        u32::try_from(i64::from(pos) + self.delta).unwrap_or(0)
    }

    /// Copy `node` and its descendants, preserving kinds and field roles.
    pub fn copy(&self, node: Node<'_>, builder: &mut TreeBuilder) {
        ensure_sufficient_stack(|| self.copy_node(node, builder));
    }

    fn copy_node(&self, node: Node<'_>, builder: &mut TreeBuilder) {
        if let Some(kind) = node.token() {
            let token = Token::new(kind, self.shift(node.start()), self.shift(node.end()));
            builder.leaf(token, node.kind());
        } else {
            builder.start_node(node.kind(), self.shift(node.start()));
            for child in node.children() {
                self.copy(child, builder);
            }
            builder.finish_node();
        }
        if let Some(field) = node.field() {
            builder.tag_last(field);
        }
    }
}
