//! Error-tolerant, incremental parser for Teal.
//!
//! Produces a concrete syntax tree in which every token is a leaf and
//! malformed input is wrapped in `ERROR` nodes instead of aborting the parse.
//! After [`Tree::edit`], [`reparse`] reuses the top-level statements the edit
//! did not touch.

mod builder;
pub mod chain;
mod document;
mod grammar;
pub mod incremental;
mod kind;
mod parser;
mod recovery;
mod stack;
mod tree;

pub use chain::{call_root_at, chain_root_at, chain_segments, ActiveCall, Segment};
pub use document::{ContentChange, Document};
pub use incremental::IncrementalStats;
pub use kind::{Field, SyntaxKind};
pub use recovery::TokenSet;
pub use tree::{Descendants, Node, NodeId, ParseError, Tree};

use incremental::{IncrementalState, SyntaxCursor};
use parser::Parser;

/// Parse `source` from scratch.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Tree {
    Parser::new(source, None).parse_program().0
}

/// Parse `source`, the text of `old` after the edits recorded with
/// [`Tree::edit`], reusing unaffected statements of `old`.
///
/// Without a recorded edit this is a full parse.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn reparse(source: &str, old: &Tree) -> (Tree, IncrementalStats) {
    let Some(marker) = old.pending_change().cloned() else {
        return (parse(source), IncrementalStats::default());
    };
    let state = IncrementalState::new(SyntaxCursor::new(old, marker));
    let (tree, stats) = Parser::new(source, Some(state)).parse_program();
    tracing::debug!(
        reused = stats.reused_count,
        reparsed = stats.reparsed_count,
        "incremental parse"
    );
    (tree, stats)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
