//! Bottom-up tree construction.
//!
//! The parser opens and closes nodes around the tokens it consumes. A
//! [`Checkpoint`] remembers a position among the open node's children so a
//! node can be started retroactively (`a` becomes the object of `a.b` once
//! the `.` is seen).

use std::sync::Arc;

use tl_ir::Span;
use tl_lexer::Token;

use crate::kind::{Field, SyntaxKind};
use crate::tree::{NodeData, NodeId, ParseError, Tree};

/// Position among the children of the innermost open node.
#[derive(Copy, Clone, Debug)]
pub struct Checkpoint(usize);

struct Frame {
    kind: SyntaxKind,
    start: u32,
    children: Vec<NodeId>,
    has_error: bool,
}

pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    stack: Vec<Frame>,
    errors: Vec<ParseError>,
}

impl TreeBuilder {
    /// Start building; the root node is opened immediately.
    pub fn new(root: SyntaxKind) -> Self {
        TreeBuilder {
            nodes: Vec::new(),
            stack: vec![Frame {
                kind: root,
                start: 0,
                children: Vec::new(),
                has_error: false,
            }],
            errors: Vec::new(),
        }
    }

    pub fn start_node(&mut self, kind: SyntaxKind, at: u32) {
        self.stack.push(Frame {
            kind,
            start: at,
            children: Vec::new(),
            has_error: false,
        });
    }

    /// Open a node whose first children are those added since `checkpoint`.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind, at: u32) {
        let children = self
            .top_mut()
            .map(|top| top.children.split_off(checkpoint.0.min(top.children.len())))
            .unwrap_or_default();
        self.stack.push(Frame {
            kind,
            start: at,
            children,
            has_error: false,
        });
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.stack.last().map_or(0, |top| top.children.len()))
    }

    /// Close the innermost node. Nodes without children are dropped.
    pub fn finish_node(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if frame.children.is_empty() {
            if frame.has_error {
                self.mark_error();
            }
            return;
        }
        let id = self.alloc(frame);
        self.push_child(id);
    }

    /// Add a leaf for `token`.
    pub fn token(&mut self, token: Token) {
        self.leaf(token, SyntaxKind::leaf(token.kind));
    }

    /// Add a leaf for `token` with an explicit node kind.
    pub fn leaf(&mut self, token: Token, kind: SyntaxKind) {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            span: Span::new(token.start, token.end),
            field: None,
            parent: None,
            children: Vec::new(),
            token: Some(token.kind),
            has_error: kind == SyntaxKind::Error,
        });
        self.push_child(id);
    }

    /// Give the single child added since `checkpoint` a field role.
    pub fn tag_since(&mut self, checkpoint: Checkpoint, field: Field) {
        let Some(top) = self.stack.last() else {
            return;
        };
        if top.children.len() == checkpoint.0 + 1 {
            let id = top.children[checkpoint.0];
            self.nodes[id.index()].field = Some(field);
        }
    }

    /// Give the most recently added child a field role.
    pub fn tag_last(&mut self, field: Field) {
        if let Some(&id) = self.stack.last().and_then(|top| top.children.last()) {
            self.nodes[id.index()].field = Some(field);
        }
    }

    /// Kind of the most recently added child of the open node.
    pub fn last_kind(&self) -> Option<SyntaxKind> {
        let id = self.stack.last()?.children.last()?;
        Some(self.nodes[id.index()].kind)
    }

    /// Flag the innermost open node as containing a syntax error.
    pub fn mark_error(&mut self) {
        if let Some(top) = self.top_mut() {
            top.has_error = true;
        }
    }

    pub fn error(&mut self, span: Span, message: impl Into<String>) {
        self.mark_error();
        self.errors.push(ParseError {
            span,
            message: message.into(),
        });
    }

    /// Close all open nodes and produce the tree. The root spans the whole text.
    pub fn finish(mut self, text: &str) -> Tree {
        while self.stack.len() > 1 {
            self.finish_node();
        }
        let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
        let root = match self.stack.pop() {
            Some(mut frame) => {
                frame.start = 0;
                let id = self.alloc(frame);
                self.nodes[id.index()].span = Span::new(0, len);
                id
            }
            None => self.alloc(Frame {
                kind: SyntaxKind::Program,
                start: 0,
                children: Vec::new(),
                has_error: false,
            }),
        };
        self.errors.sort_by_key(|e| (e.span.start, e.span.end));
        Tree {
            text: Arc::from(text),
            nodes: self.nodes,
            root,
            errors: self.errors,
            marker: None,
        }
    }

    fn top_mut(&mut self) -> Option<&mut Frame> {
        self.stack.last_mut()
    }

    fn push_child(&mut self, id: NodeId) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(id);
        }
    }

    fn alloc(&mut self, frame: Frame) -> NodeId {
        let span = match (frame.children.first(), frame.children.last()) {
            (Some(first), Some(last)) => Span::new(
                self.nodes[first.index()].span.start,
                self.nodes[last.index()].span.end,
            ),
            _ => Span::point(frame.start),
        };
        let id = NodeId::from_index(self.nodes.len());
        let has_error = frame.has_error
            || frame.kind == SyntaxKind::Error
            || frame
                .children
                .iter()
                .any(|child| self.nodes[child.index()].has_error);
        for child in &frame.children {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(NodeData {
            kind: frame.kind,
            span,
            field: None,
            parent: None,
            children: frame.children,
            token: None,
            has_error,
        });
        id
    }
}
