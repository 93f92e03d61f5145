//! Type information for Teal, as reported by the `tl` compiler.
//!
//! Nothing here checks types. [`TypeReport`] holds the compiler's JSON
//! report, [`scope`] answers which names are visible at a position, and
//! [`TypeWalker`] follows member-access chains through the type table.

mod display;
mod kind;
mod report;
pub mod scope;
mod walk;

pub use display::{prettify, signature, type_name, Signature};
pub use kind::{codes, TypeKind};
pub use report::{
    Location, Param, ReportError, SymbolEntry, SymbolKind, TypeId, TypeInfo, TypeReport,
    SCOPE_CLOSE, SCOPE_OPEN,
};
pub use scope::{lookup, visible_symbols, Binding};
pub use walk::{ResolveMiss, TypeWalker};
