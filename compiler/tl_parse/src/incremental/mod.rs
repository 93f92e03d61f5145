//! Statement reuse across edits.
//!
//! After [`Tree::edit`](crate::Tree::edit) records a change, the parser walks
//! the old tree with a [`SyntaxCursor`]. A top-level statement that starts
//! where the parser stands, lies outside the changed region and has no
//! syntax errors is copied by [`TreeCopier`] with its spans shifted, instead
//! of being parsed again.

mod copier;
mod cursor;

pub use copier::TreeCopier;
pub use cursor::SyntaxCursor;

/// How many top-level statements the last parse reused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncrementalStats {
    pub reused_count: usize,
    pub reparsed_count: usize,
}

/// Reuse state threaded through one reparse.
pub struct IncrementalState<'old> {
    pub cursor: SyntaxCursor<'old>,
    pub stats: IncrementalStats,
}

impl<'old> IncrementalState<'old> {
    pub fn new(cursor: SyntaxCursor<'old>) -> Self {
        IncrementalState {
            cursor,
            stats: IncrementalStats::default(),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
