//! Grammar productions, split by syntactic category.
//!
//! Each submodule adds methods to [`Parser`](crate::parser::Parser). The
//! productions never fail: missing pieces are recorded as errors and the
//! node is closed with whatever was parsed.

mod decl;
mod expr;
mod stmt;
mod ty;
