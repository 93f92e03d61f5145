//! `tl check` stderr to diagnostics.
//!
//! The compiler prints a count header before each group of messages
//! (`2 warnings:`, `1 error:`) and one `file:line[:column]: message` line
//! per diagnostic. Everything else is ignored.

use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostic::{Diagnostic, DiagnosticMap, Severity};
use crate::paths::PathMapper;

/// Marker of a Lua error inside the compiler itself.
pub const CRASH_MARKER: &str = "stack traceback:";

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+ (warning|error)s?:\s*$").expect("valid section pattern")
});

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?):(\d+):(?:(\d+):)?\s*(.*)$").expect("valid location pattern")
});

/// Result of translating one `tl check` run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Diagnostics(DiagnosticMap),
    /// The compiler crashed; carries its raw output.
    Crashed(String),
}

/// Translate the stderr of `tl check`.
#[tracing::instrument(level = "debug", skip_all, fields(document = %paths.document()))]
pub fn translate(stderr: &str, paths: &PathMapper) -> CheckOutcome {
    if stderr.contains(CRASH_MARKER) {
        tracing::warn!("compiler crashed while checking");
        return CheckOutcome::Crashed(stderr.to_owned());
    }

    let mut diagnostics = DiagnosticMap::new(paths.document().clone());
    let mut severity = Severity::Error;
    for line in stderr.lines() {
        if let Some(caps) = SECTION.captures(line) {
            severity = if &caps[1] == "warning" {
                Severity::Warning
            } else {
                Severity::Error
            };
            continue;
        }
        let Some(caps) = LOCATION.captures(line) else {
            continue;
        };
        let Ok(row) = caps[2].parse::<u32>() else {
            continue;
        };
        let Some(file) = paths.to_uri(&caps[1]) else {
            tracing::trace!(file = &caps[1], "dropping diagnostic outside the workspace");
            continue;
        };
        let column = caps.get(3).and_then(|c| c.as_str().parse::<u32>().ok());
        let range = Diagnostic::compiler_range(row, column);
        let diagnostic = match severity {
            Severity::Error => Diagnostic::error(file, range),
            Severity::Warning => Diagnostic::warning(file, range),
        };
        diagnostics.push(diagnostic.with_message(&caps[4]));
    }
    tracing::debug!(
        files = diagnostics.len(),
        errors = diagnostics.error_count(),
        "translated check output"
    );
    CheckOutcome::Diagnostics(diagnostics)
}
