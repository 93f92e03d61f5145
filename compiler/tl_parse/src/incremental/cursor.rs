//! Cursor navigation for finding reusable statements.

use tl_ir::incremental::ChangeMarker;
use tracing::trace;

use crate::tree::{Node, NodeId, Tree};

/// Navigator over the top-level statements of an old tree.
pub struct SyntaxCursor<'old> {
    tree: &'old Tree,
    marker: ChangeMarker,
    statements: Vec<NodeId>,
    current_index: usize,
}

impl<'old> SyntaxCursor<'old> {
    pub fn new(tree: &'old Tree, marker: ChangeMarker) -> Self {
        let statements = tree.root().children().map(|node| node.id()).collect();
        SyntaxCursor {
            tree,
            marker,
            statements,
            current_index: 0,
        }
    }

    /// Find a reusable statement that starts exactly at `pos` (new text).
    ///
    /// Returns `None` when the next statement outside the affected region
    /// starts elsewhere or contains a syntax error. Calls must use
    /// non-decreasing positions.
    pub fn find_at(&mut self, pos: u32) -> Option<Node<'old>> {
        while let Some(&id) = self.statements.get(self.current_index) {
            let node = self.tree.node(id);
            if !self.marker.is_reusable(node.span()) {
                trace!(span = %node.span(), "statement touches the edit");
            } else if self.marker.adjust_position(node.start()) >= pos {
                break;
            }
            self.current_index += 1;
        }

        let node = self.tree.node(*self.statements.get(self.current_index)?);
        (self.marker.adjust_position(node.start()) == pos && !node.has_error()).then_some(node)
    }

    /// First leaf of the statement after `node`, `None` at end of input.
    pub fn next_leaf_after(&self, node: Node<'old>) -> Option<Node<'old>> {
        let index = self.statements.iter().position(|&id| id == node.id())?;
        let next = self.tree.node(*self.statements.get(index + 1)?);
        next.descendants().find(|n| n.is_leaf())
    }

    /// Advance the cursor past a statement (after reusing it).
    pub fn advance(&mut self) {
        if self.current_index < self.statements.len() {
            self.current_index += 1;
        }
    }
}
