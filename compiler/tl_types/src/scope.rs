//! Names visible at a position.
//!
//! The symbol table is a flattened, position-ordered walk of nested scopes.
//! Walking it backward from the cursor and skipping every scope that closed
//! before the cursor visits exactly the declarations still in scope, closest
//! first.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::report::{SymbolEntry, SymbolKind, TypeId, TypeReport};

/// A name bound at some position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub type_id: TypeId,
    /// 1-based declaration position; `None` for globals.
    pub declared_at: Option<(u32, u32)>,
}

/// Index of the last symbol at or before `(line, column)`.
///
/// Among entries sharing a position the rightmost one is returned.
pub fn position_index(symbols: &[SymbolEntry], line: u32, column: u32) -> Option<usize> {
    symbols
        .partition_point(|entry| entry.position() <= (line, column))
        .checked_sub(1)
}

/// Declarations in scope at `start`, closest first.
struct ScopeWalk<'r> {
    symbols: &'r [SymbolEntry],
    next: Option<usize>,
}

impl<'r> Iterator for ScopeWalk<'r> {
    type Item = (&'r str, Binding);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let index = self.next?;
            let entry = &self.symbols[index];
            match &entry.kind {
                SymbolKind::Declaration { name, type_id } => {
                    self.next = index.checked_sub(1);
                    return Some((
                        name.as_str(),
                        Binding {
                            type_id: *type_id,
                            declared_at: Some(entry.position()),
                        },
                    ));
                }
                SymbolKind::ScopeClose { open_index } => {
                    self.next = open_index.checked_sub(1);
                }
                SymbolKind::ScopeOpen => {
                    self.next = index.checked_sub(1);
                }
            }
        }
    }
}

fn walk(report: &TypeReport, line: u32, column: u32) -> ScopeWalk<'_> {
    let symbols = report.symbols();
    ScopeWalk {
        symbols,
        next: position_index(symbols, line, column),
    }
}

/// Every name visible at the 1-based position, locals shadowing globals.
pub fn visible_symbols(report: &TypeReport, line: u32, column: u32) -> FxHashMap<String, Binding> {
    let mut visible: FxHashMap<String, Binding> = report
        .globals()
        .iter()
        .map(|(name, &type_id)| {
            (
                name.clone(),
                Binding {
                    type_id,
                    declared_at: None,
                },
            )
        })
        .collect();

    let mut bound = FxHashSet::default();
    for (name, binding) in walk(report, line, column) {
        if bound.insert(name) {
            visible.insert(name.to_owned(), binding);
        }
    }
    visible
}

/// The binding `name` refers to at the 1-based position.
pub fn lookup(report: &TypeReport, name: &str, line: u32, column: u32) -> Option<Binding> {
    walk(report, line, column)
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, binding)| binding)
        .or_else(|| {
            report.global(name).map(|type_id| Binding {
                type_id,
                declared_at: None,
            })
        })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
