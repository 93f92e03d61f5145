use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn report(symbols: serde_json::Value, globals: serde_json::Value) -> TypeReport {
    let json = json!({ "symbols": symbols, "globals": globals });
    TypeReport::from_json(&json.to_string(), "a.tl").unwrap()
}

fn id(raw: u32) -> TypeId {
    TypeId::from_raw(raw)
}

/// ```teal
/// local a = 1
/// do
///   local b = 2
///   local a = "s"
/// end
/// local c = 3
/// local function f()
///   local d = true
///
/// end
/// ```
fn nested() -> TypeReport {
    report(
        json!([
            [1, 7, "a", 1],
            [2, 1, "@{", 0],
            [3, 9, "b", 1],
            [4, 9, "a", 2],
            [5, 1, "@}", 1],
            [6, 7, "c", 1],
            [7, 16, "f", 3],
            [7, 17, "@{", 0],
            [8, 9, "d", 4],
            [10, 1, "@}", 7]
        ]),
        json!({ "print": 5, "a": 6 }),
    )
}

fn names(visible: &FxHashMap<String, Binding>) -> Vec<&str> {
    let mut names: Vec<_> = visible.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

#[test]
fn test_inside_function_body() {
    let visible = visible_symbols(&nested(), 9, 3);
    assert_eq!(names(&visible), vec!["a", "c", "d", "f", "print"]);
    assert_eq!(
        visible["a"],
        Binding {
            type_id: id(1),
            declared_at: Some((1, 7))
        }
    );
    assert_eq!(visible["print"].declared_at, None);
}

#[test]
fn test_inner_declaration_shadows_outer() {
    let visible = visible_symbols(&nested(), 4, 20);
    assert_eq!(names(&visible), vec!["a", "b", "print"]);
    assert_eq!(visible["a"].type_id, id(2));
}

#[test]
fn test_closed_scope_is_skipped() {
    let visible = visible_symbols(&nested(), 6, 12);
    assert!(!visible.contains_key("b"));
    assert_eq!(visible["a"].type_id, id(1));
}

#[test]
fn test_before_first_symbol_only_globals() {
    let visible = visible_symbols(&nested(), 1, 1);
    assert_eq!(names(&visible), vec!["a", "print"]);
    assert_eq!(visible["a"].type_id, id(6));
}

#[test]
fn test_after_everything_closed() {
    let visible = visible_symbols(&nested(), 11, 1);
    assert_eq!(names(&visible), vec!["a", "c", "f", "print"]);
}

#[test]
fn test_lookup() {
    let report = nested();
    assert_eq!(lookup(&report, "a", 4, 20).map(|b| b.type_id), Some(id(2)));
    assert_eq!(lookup(&report, "a", 1, 1).map(|b| b.type_id), Some(id(6)));
    assert_eq!(lookup(&report, "d", 11, 1), None);
    assert_eq!(lookup(&report, "print", 9, 1).map(|b| b.type_id), Some(id(5)));
}

#[test]
fn test_position_index_rightmost_duplicate() {
    let report = report(
        json!([[1, 1, "x", 1], [1, 5, "y", 1], [1, 5, "z", 2], [2, 1, "w", 1]]),
        json!({}),
    );
    let symbols = report.symbols();
    assert_eq!(position_index(symbols, 1, 5), Some(2));
    assert_eq!(position_index(symbols, 1, 4), Some(0));
    assert_eq!(position_index(symbols, 0, 9), None);
    assert_eq!(position_index(symbols, 9, 9), Some(3));
    assert_eq!(position_index(&[], 1, 1), None);
}

mod proptest_model {
    use proptest::prelude::*;

    use super::*;

    #[derive(Clone, Debug)]
    enum Op {
        Open,
        Close,
        Declare(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Open), Just(Op::Close), (0u8..4).prop_map(Op::Declare)]
    }

    /// Symbol rows for `ops`, one per line, with every scope balanced.
    fn rows(ops: &[Op]) -> Vec<serde_json::Value> {
        let mut rows = Vec::new();
        let mut open = Vec::new();
        let mut line = 1;
        for op in ops {
            match op {
                Op::Open => {
                    open.push(rows.len());
                    rows.push(json!([line, 1, "@{", 0]));
                }
                Op::Close => {
                    let Some(target) = open.pop() else { continue };
                    rows.push(json!([line, 1, "@}", target]));
                }
                Op::Declare(n) => {
                    let type_id = 100 + rows.len();
                    rows.push(json!([line, 1, format!("v{n}"), type_id]));
                }
            }
            line += 1;
        }
        while let Some(target) = open.pop() {
            rows.push(json!([line, 1, "@}", target]));
            line += 1;
        }
        rows
    }

    /// Forward simulation with an explicit scope stack.
    fn model(report: &TypeReport, line: u32) -> FxHashMap<String, TypeId> {
        let mut stack: Vec<Vec<(String, TypeId)>> = vec![Vec::new()];
        for entry in report.symbols().iter().filter(|e| e.line <= line) {
            match &entry.kind {
                SymbolKind::ScopeOpen => stack.push(Vec::new()),
                SymbolKind::ScopeClose { .. } => {
                    stack.pop();
                }
                SymbolKind::Declaration { name, type_id } => {
                    if let Some(scope) = stack.last_mut() {
                        scope.push((name.clone(), *type_id));
                    }
                }
            }
        }
        let mut visible: FxHashMap<String, TypeId> = report
            .globals()
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();
        for (name, type_id) in stack.into_iter().flatten() {
            visible.insert(name, type_id);
        }
        visible
    }

    proptest! {
        #[test]
        fn matches_scope_stack(ops in prop::collection::vec(op(), 0..40), query in 0u32..50) {
            let report = report(json!(rows(&ops)), json!({ "v0": 1, "g": 2 }));
            let visible: FxHashMap<String, TypeId> = visible_symbols(&report, query, 1)
                .into_iter()
                .map(|(name, binding)| (name, binding.type_id))
                .collect();
            prop_assert_eq!(visible, model(&report, query));
        }
    }
}
