//! Source location types shared by the Teal language server crates.
//!
//! Two coordinate systems meet here:
//!
//! - byte offsets ([`Span`]) used by the lexer, parser and syntax tree;
//! - zero-based row/byte-column [`Point`]s used for editor positions.
//!
//! [`LineIndex`] converts between them (and to UTF-16 columns for the
//! protocol boundary). [`incremental`] describes edits in byte offsets.

pub mod incremental;
mod line_index;
mod span;

pub use line_index::{LineIndex, Point, TextRange};
pub use span::Span;
