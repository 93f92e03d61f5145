use std::collections::BTreeMap;
use std::fmt;

use tl_ir::{Point, TextRange};
use url::Url;

/// Column used as the end of a diagnostic that covers a whole line.
pub const LINE_END: u32 = u32::MAX;

/// Source tag attached to every diagnostic.
pub const SOURCE: &str = "tl";

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One compiler message, positioned in a file.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub file: Url,
    pub severity: Severity,
    /// Zero-based; byte columns as the compiler counts them.
    pub range: TextRange,
    pub message: String,
    pub source: &'static str,
}

impl Diagnostic {
    fn new(file: Url, severity: Severity, range: TextRange) -> Self {
        Diagnostic {
            file,
            severity,
            range,
            message: String::new(),
            source: SOURCE,
        }
    }

    pub fn error(file: Url, range: TextRange) -> Self {
        Self::new(file, Severity::Error, range)
    }

    pub fn warning(file: Url, range: TextRange) -> Self {
        Self::new(file, Severity::Warning, range)
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Range for a 1-based compiler position. Without a column the whole
    /// line is covered.
    pub fn compiler_range(line: u32, column: Option<u32>) -> TextRange {
        let row = line.saturating_sub(1);
        match column {
            Some(column) => {
                let point = Point::new(row, column.saturating_sub(1));
                TextRange::new(point, point)
            }
            None => TextRange::new(Point::new(row, 0), Point::new(row, LINE_END)),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Diagnostics grouped by file.
///
/// The primary document always has an entry, so publishing the map clears
/// diagnostics that no longer apply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticMap {
    by_file: BTreeMap<Url, Vec<Diagnostic>>,
}

impl DiagnosticMap {
    pub fn new(primary: Url) -> Self {
        let mut by_file = BTreeMap::new();
        by_file.insert(primary, Vec::new());
        DiagnosticMap { by_file }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.by_file
            .entry(diagnostic.file.clone())
            .or_default()
            .push(diagnostic);
    }

    pub fn get(&self, file: &Url) -> Option<&[Diagnostic]> {
        self.by_file.get(file).map(Vec::as_slice)
    }

    pub fn files(&self) -> impl Iterator<Item = &Url> {
        self.by_file.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Url, &[Diagnostic])> {
        self.by_file.iter().map(|(file, diags)| (file, diags.as_slice()))
    }

    /// Number of files with an entry.
    pub fn len(&self) -> usize {
        self.by_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.by_file
            .values()
            .flatten()
            .filter(|diag| diag.is_error())
            .count()
    }
}

impl IntoIterator for DiagnosticMap {
    type Item = (Url, Vec<Diagnostic>);
    type IntoIter = std::collections::btree_map::IntoIter<Url, Vec<Diagnostic>>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_file.into_iter()
    }
}
