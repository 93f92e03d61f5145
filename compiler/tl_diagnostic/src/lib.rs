//! Diagnostics reported by `tl check`.
//!
//! The compiler checks a temporary copy of the edited document and prints
//! its findings as text. [`translate`] turns that text into per-file
//! [`Diagnostic`]s, with [`PathMapper`] pointing messages about the copy
//! back at the document they came from.

mod diagnostic;
pub mod paths;
mod translate;

pub use diagnostic::{Diagnostic, DiagnosticMap, Severity, LINE_END, SOURCE};
pub use paths::{is_temp_file, PathMapper, TEMP_FILE_PREFIX};
pub use translate::{translate, CheckOutcome, CRASH_MARKER};
